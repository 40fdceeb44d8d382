//! The operator-facing league: store plus the play day in progress
//!
//! Every operation either returns its result or a [`LeagueError`]; nothing is
//! retried or ignored here. A shell (terminal, web page) drives a single
//! `League` and decides when to render.

use chrono::NaiveDate;
use std::path::Path;
use tracing::info;

use crate::accounting::{DraftSession, TableCheck, TableReport};
use crate::error::{LeagueError, Result};
use crate::roster::Roster;
use crate::standings::{self, Standing};
use crate::store::LeagueStore;
use crate::types::{CommittedSession, LeagueConfig};

#[derive(Debug, Clone, Default)]
pub struct League {
    store: LeagueStore,
    draft: Option<DraftSession>,
}

impl League {
    /// Empty league with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_store(store: LeagueStore) -> Self {
        Self { store, draft: None }
    }

    pub fn store(&self) -> &LeagueStore {
        &self.store
    }

    pub fn config(&self) -> LeagueConfig {
        self.store.config()
    }

    pub fn add_player(&mut self, name: &str) -> Result<()> {
        self.store.add_player(name)
    }

    /// Remove a player. A play day in progress keeps its seat; the commit
    /// will refuse it until the draft is redrawn.
    pub fn remove_player(&mut self, name: &str) -> Result<()> {
        self.store.remove_player(name).map(|_| ())
    }

    /// Registered players in registration order
    pub fn list_players(&self) -> &Roster {
        self.store.players()
    }

    pub fn set_configuration(&mut self, league_name: Option<String>, base_stake: Option<u32>) -> Result<()> {
        self.store.set_config(league_name, base_stake)
    }

    /// Draw tables for a new play day, replacing any draft in progress
    pub fn begin_draft<S: AsRef<str>>(
        &mut self,
        present_players: &[S],
        group_size: usize,
        date: NaiveDate,
    ) -> Result<&DraftSession> {
        let draft = DraftSession::begin(&self.store, present_players, group_size, date)?;
        if self.draft.is_some() {
            info!("previous draw replaced");
        }
        Ok(self.draft.insert(draft))
    }

    pub fn draft(&self) -> Option<&DraftSession> {
        self.draft.as_ref()
    }

    /// Drop the play day in progress, if any
    pub fn discard_draft(&mut self) -> Option<DraftSession> {
        let draft = self.draft.take();
        if draft.is_some() {
            info!("play day discarded");
        }
        draft
    }

    pub fn start_result_entry(&mut self) -> Result<()> {
        self.draft_mut()?.start_result_entry();
        Ok(())
    }

    /// Record cash for a seat; `table` is 0-based
    pub fn record_table_entry(&mut self, table: usize, player: &str, amount_on_table: u32, top_up: u32) -> Result<()> {
        self.draft_mut()?
            .record_entry(table, player, amount_on_table, top_up)
    }

    /// Money check of one table at the current stake; `table` is 0-based
    pub fn validate_table(&self, table: usize) -> Result<TableCheck> {
        self.draft_ref()?.validate_table(table, self.store.base_stake())
    }

    pub fn table_report(&self, table: usize) -> Result<TableReport> {
        self.draft_ref()?.table_report(table, self.store.base_stake())
    }

    /// Settle the play day in progress.
    ///
    /// All or nothing: on any failure the store and the draft are left as
    /// they were, so entries can be corrected and the commit retried.
    pub fn commit(&mut self) -> Result<&CommittedSession> {
        let session = self.draft_ref()?.settle(&self.store)?;
        let committed = self.store.apply_session(session)?;
        self.draft = None;
        Ok(committed)
    }

    pub fn leaderboard(&self) -> Vec<Standing> {
        standings::leaderboard(self.store.players())
    }

    /// Leaderboard in the delimited export format
    pub fn export_standings(&self, delimiter: char) -> String {
        standings::export_delimited(&self.leaderboard(), delimiter)
    }

    /// Settled play days, most recent first
    pub fn history(&self) -> impl Iterator<Item = &CommittedSession> {
        standings::history(self.store.sessions())
    }

    pub fn serialize(&self) -> Result<String> {
        self.store.serialize()
    }

    /// Replace the whole league with a snapshot. On failure nothing changes;
    /// on success any play day in progress is dropped.
    pub fn deserialize(&mut self, blob: &str) -> Result<()> {
        self.store = LeagueStore::deserialize(blob)?;
        self.draft = None;
        Ok(())
    }

    /// Start over with an empty league
    pub fn reset(&mut self) {
        self.store.reset();
        self.draft = None;
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.store.save(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        LeagueStore::load(path).map(Self::from_store)
    }

    /// Suggested snapshot file name
    pub fn snapshot_file_name(&self) -> String {
        format!("{}.json", self.store.file_stem())
    }

    /// Suggested standings export file name
    pub fn standings_file_name(&self) -> String {
        format!("{}_standings.csv", self.store.file_stem())
    }

    fn draft_ref(&self) -> Result<&DraftSession> {
        self.draft.as_ref().ok_or(LeagueError::NoDraft)
    }

    fn draft_mut(&mut self) -> Result<&mut DraftSession> {
        self.draft.as_mut().ok_or(LeagueError::NoDraft)
    }
}

#[cfg(test)]
#[path = "league_tests.rs"]
mod league_tests;
