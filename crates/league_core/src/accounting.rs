//! Play-day settlement
//!
//! A play day goes through three stages:
//! 1. [`DraftSession::begin`] draws the tables from current standings
//! 2. cash entries are recorded per seat (what is on the table, top-ups)
//! 3. [`DraftSession::settle`] checks every table and produces the
//!    [`CommittedSession`] that the store applies
//!
//! Each table must conserve money: the stakes of everyone seated plus all
//! top-ups must equal the cash left on the table.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{LeagueError, Result};
use crate::pairing::pair;
use crate::store::LeagueStore;
use crate::types::{CommittedSession, GroupSize, ResultRow, Table};

/// Cash recorded for one seat
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeatEntry {
    pub amount_on_table: u32,
    pub top_up: u32,
}

/// Money check of one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCheck {
    /// 0-based
    pub table: usize,
    /// `stake * seats + top-ups - cash on table`
    pub difference: i64,
}

impl TableCheck {
    pub fn is_balanced(&self) -> bool {
        self.difference == 0
    }
}

/// Settlement preview of one table, for display while results are entered
#[derive(Debug, Clone, PartialEq)]
pub struct TableReport {
    pub check: TableCheck,
    /// Seats in draw order
    pub rows: Vec<ResultRow>,
}

impl TableReport {
    /// Highest profit at the table
    pub fn best_profit(&self) -> Option<i64> {
        self.rows.iter().map(|r| r.profit).max()
    }

    /// Lowest profit at the table
    pub fn worst_profit(&self) -> Option<i64> {
        self.rows.iter().map(|r| r.profit).min()
    }
}

/// A play day that is being drawn or entered, not yet part of history
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSession {
    date: NaiveDate,
    present_players: Vec<String>,
    group_size: GroupSize,
    tables: Vec<Table>,
    /// `None` until result entry starts; then one entry per seat, parallel to `tables`
    results: Option<Vec<Vec<SeatEntry>>>,
}

impl DraftSession {
    /// Draw tables for the players present today.
    ///
    /// Every present player must be registered; the draw ranks them by their
    /// current total profit, ties in the order given.
    pub fn begin<S: AsRef<str>>(
        store: &LeagueStore,
        present_players: &[S],
        group_size: usize,
        date: NaiveDate,
    ) -> Result<Self> {
        let present = present_players.len();
        let size = GroupSize::new(group_size)
            .filter(|_| present >= group_size)
            .ok_or(LeagueError::InvalidGroupSize {
                requested: group_size,
                present,
            })?;

        let mut standings: Vec<(&str, i64)> = Vec::with_capacity(present);
        for name in present_players {
            let name = name.as_ref();
            let player = store
                .player(name)
                .ok_or_else(|| LeagueError::UnknownPlayer(name.to_string()))?;
            if standings.iter().any(|(seen, _)| *seen == name) {
                return Err(LeagueError::DuplicatePlayer(name.to_string()));
            }
            standings.push((name, player.stats.total_profit));
        }

        let tables = pair(standings.iter().copied(), size)?;
        debug!(%date, players = present, tables = tables.len(), "tables drawn");

        Ok(Self {
            date,
            present_players: present_players.iter().map(|s| s.as_ref().to_string()).collect(),
            group_size: size,
            tables,
            results: None,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn present_players(&self) -> &[String] {
        &self.present_players
    }

    pub fn group_size(&self) -> GroupSize {
        self.group_size
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Whether result entry has started
    pub fn has_results(&self) -> bool {
        self.results.is_some()
    }

    /// Open the result sheet; every seat starts at zero cash and zero top-up.
    /// Calling it again keeps what was already entered.
    pub fn start_result_entry(&mut self) {
        if self.results.is_none() {
            self.results = Some(
                self.tables
                    .iter()
                    .map(|t| vec![SeatEntry::default(); t.len()])
                    .collect(),
            );
        }
    }

    /// Record cash for `player` at table `table` (0-based). Replaces any
    /// earlier entry for the seat.
    pub fn record_entry(&mut self, table: usize, player: &str, amount_on_table: u32, top_up: u32) -> Result<()> {
        let seat = self.seat_of(table, player)?;
        self.start_result_entry();
        if let Some(results) = self.results.as_mut() {
            results[table][seat] = SeatEntry {
                amount_on_table,
                top_up,
            };
        }
        debug!(table, player, amount_on_table, top_up, "seat recorded");
        Ok(())
    }

    /// Entry for a seat, zero if nothing was recorded
    pub fn entry(&self, table: usize, player: &str) -> Result<SeatEntry> {
        let seat = self.seat_of(table, player)?;
        Ok(self.seat_entry(table, seat))
    }

    /// Money check for table `table` (0-based)
    pub fn validate_table(&self, table: usize, base_stake: u32) -> Result<TableCheck> {
        let seats = self
            .tables
            .get(table)
            .ok_or(LeagueError::UnknownTable(table.saturating_add(1)))?;

        let (cash, top_ups) = (0..seats.len())
            .map(|seat| self.seat_entry(table, seat))
            .fold((0i64, 0i64), |(cash, top_ups), e| {
                (cash + i64::from(e.amount_on_table), top_ups + i64::from(e.top_up))
            });
        let expected = i64::from(base_stake) * seats.len() as i64;

        Ok(TableCheck {
            table,
            difference: expected + top_ups - cash,
        })
    }

    /// Money checks of every table
    pub fn validate_all(&self, base_stake: u32) -> Vec<TableCheck> {
        (0..self.tables.len())
            .filter_map(|t| self.validate_table(t, base_stake).ok())
            .collect()
    }

    /// Check plus per-seat profits for table `table` (0-based)
    pub fn table_report(&self, table: usize, base_stake: u32) -> Result<TableReport> {
        let check = self.validate_table(table, base_stake)?;
        let rows = self.table_rows(table, base_stake);
        Ok(TableReport { check, rows })
    }

    /// Turn the draft into a settled play day.
    ///
    /// All tables must balance and every seated player must still be
    /// registered in `store`. Nothing is applied here; the store applies the
    /// returned session.
    pub fn settle(&self, store: &LeagueStore) -> Result<CommittedSession> {
        let base_stake = store.base_stake();

        if let Some(check) = self.validate_all(base_stake).into_iter().find(|c| !c.is_balanced()) {
            warn!(table = check.table + 1, difference = check.difference, "play day does not balance");
            return Err(LeagueError::UnbalancedTable {
                table: check.table + 1,
                difference: check.difference,
            });
        }

        if let Some(name) = self.tables.iter().flatten().find(|n| store.player(n).is_none()) {
            warn!(player = %name, "seated player is no longer registered");
            return Err(LeagueError::UnknownPlayer(name.clone()));
        }

        let results = (0..self.tables.len())
            .flat_map(|t| self.table_rows(t, base_stake))
            .collect();

        Ok(CommittedSession {
            date: self.date,
            players: self.present_players.clone(),
            group_size: self.group_size,
            tables: self.tables.clone(),
            results,
        })
    }

    fn table_rows(&self, table: usize, base_stake: u32) -> Vec<ResultRow> {
        self.tables
            .get(table)
            .map(|seats| {
                seats
                    .iter()
                    .enumerate()
                    .map(|(seat, name)| {
                        let e = self.seat_entry(table, seat);
                        ResultRow::settle(name, e.amount_on_table, e.top_up, base_stake, table + 1)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn seat_of(&self, table: usize, player: &str) -> Result<usize> {
        let seats = self
            .tables
            .get(table)
            .ok_or(LeagueError::UnknownTable(table.saturating_add(1)))?;
        seats
            .iter()
            .position(|n| n == player)
            .ok_or_else(|| LeagueError::NotSeated {
                player: player.to_string(),
                table: table + 1,
            })
    }

    fn seat_entry(&self, table: usize, seat: usize) -> SeatEntry {
        self.results
            .as_ref()
            .and_then(|r| r.get(table))
            .and_then(|t| t.get(seat))
            .copied()
            .unwrap_or_default()
    }
}

/// Sum of profits at a table, zero whenever the table balances
pub fn table_profit_sum(rows: &[ResultRow]) -> i64 {
    rows.iter().map(|r| r.profit).sum()
}

#[cfg(test)]
#[path = "accounting_tests.rs"]
mod accounting_tests;
