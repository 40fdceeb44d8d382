//! Durable league state and its snapshot format

use serde::Serialize;
use serde::de::{self, DeserializeOwned, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{LeagueError, Result};
use crate::roster::Roster;
use crate::types::{CommittedSession, LeagueConfig, Player};

const FIELD_NAME: &str = "leagueName";
const FIELD_STAKE: &str = "baseStake";
const FIELD_PLAYERS: &str = "players";
const FIELD_SESSIONS: &str = "sessions";

/// Players, settled play days and configuration of one league.
///
/// Serializes to the snapshot document:
///
/// ```json
/// {
///   "leagueName": "Card League",
///   "baseStake": 100,
///   "players": { "Anna": { "totalProfit": 30, "daysPlayed": 1 } },
///   "sessions": [ ... ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueStore {
    league_name: String,
    base_stake: u32,
    players: Roster,
    sessions: Vec<CommittedSession>,
}

impl Default for LeagueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LeagueStore {
    /// Empty league with the default configuration
    pub fn new() -> Self {
        Self::with_config(LeagueConfig::default())
    }

    pub fn with_config(config: LeagueConfig) -> Self {
        Self {
            league_name: config.league_name,
            base_stake: config.base_stake,
            players: Roster::new(),
            sessions: Vec::new(),
        }
    }

    pub fn league_name(&self) -> &str {
        &self.league_name
    }

    pub fn base_stake(&self) -> u32 {
        self.base_stake
    }

    pub fn config(&self) -> LeagueConfig {
        LeagueConfig {
            league_name: self.league_name.clone(),
            base_stake: self.base_stake,
        }
    }

    /// Update name and/or stake. The stake only affects play days settled
    /// from now on; history keeps the profits it was settled with.
    pub fn set_config(&mut self, league_name: Option<String>, base_stake: Option<u32>) -> Result<()> {
        if let Some(stake) = base_stake {
            if stake == 0 {
                return Err(LeagueError::InvalidStake(stake));
            }
            self.base_stake = stake;
        }
        if let Some(name) = league_name {
            self.league_name = name;
        }
        info!(league = %self.league_name, stake = self.base_stake, "configuration updated");
        Ok(())
    }

    pub fn players(&self) -> &Roster {
        &self.players
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    pub fn sessions(&self) -> &[CommittedSession] {
        &self.sessions
    }

    /// Register a player with zero stats
    pub fn add_player(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(LeagueError::EmptyName);
        }
        if !self.players.insert(Player::new(name)) {
            return Err(LeagueError::DuplicatePlayer(name.to_string()));
        }
        info!(player = name, "player added");
        Ok(())
    }

    /// Remove a player from future draws. Settled play days still list them.
    pub fn remove_player(&mut self, name: &str) -> Result<Player> {
        let player = self
            .players
            .remove(name)
            .ok_or_else(|| LeagueError::UnknownPlayer(name.to_string()))?;
        info!(player = name, "player removed");
        Ok(player)
    }

    /// Back to an empty league with the default configuration
    pub fn reset(&mut self) {
        *self = Self::new();
        info!("league reset");
    }

    /// Apply a settled play day. Every seated player must exist and their
    /// totals must stay in range; both are checked before anything is touched.
    pub(crate) fn apply_session(&mut self, session: CommittedSession) -> Result<&CommittedSession> {
        let mut updates = Vec::with_capacity(session.results.len());
        for row in &session.results {
            let player = self
                .players
                .get(&row.name)
                .ok_or_else(|| LeagueError::UnknownPlayer(row.name.clone()))?;
            let stats = player
                .stats
                .total_profit
                .checked_add(row.profit)
                .zip(player.stats.days_played.checked_add(1))
                .ok_or_else(|| LeagueError::StatsOverflow(row.name.clone()))?;
            updates.push((row.name.as_str(), stats));
        }

        for (name, (total_profit, days_played)) in updates {
            if let Some(player) = self.players.get_mut(name) {
                player.stats.total_profit = total_profit;
                player.stats.days_played = days_played;
            }
        }

        info!(
            date = %session.date,
            players = session.results.len(),
            tables = session.tables.len(),
            "play day committed"
        );
        self.sessions.push(session);
        Ok(&self.sessions[self.sessions.len() - 1])
    }

    /// Encode the whole league as a pretty-printed JSON snapshot
    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a snapshot produced by [`LeagueStore::serialize`].
    ///
    /// Every top-level field is required, unknown fields are refused and no
    /// object may repeat a key; the error names the field that failed.
    pub fn deserialize(blob: &str) -> Result<Self> {
        Self::decode(blob).inspect_err(|e| warn!(error = %e, "league snapshot rejected"))
    }

    fn decode(blob: &str) -> Result<Self> {
        reject_duplicate_keys(blob)?;

        let value: Value =
            serde_json::from_str(blob).map_err(|e| LeagueError::malformed("<document>", e))?;
        let Value::Object(mut doc) = value else {
            return Err(LeagueError::malformed("<document>", "expected a JSON object"));
        };

        if let Some(unknown) = doc
            .keys()
            .find(|k| ![FIELD_NAME, FIELD_STAKE, FIELD_PLAYERS, FIELD_SESSIONS].contains(&k.as_str()))
        {
            return Err(LeagueError::malformed(unknown.as_str(), "unknown field"));
        }

        let league_name: String = take_field(&mut doc, FIELD_NAME)?;
        let base_stake: u32 = take_field(&mut doc, FIELD_STAKE)?;
        let players: Roster = take_field(&mut doc, FIELD_PLAYERS)?;
        let sessions: Vec<CommittedSession> = take_field(&mut doc, FIELD_SESSIONS)?;

        if base_stake == 0 {
            return Err(LeagueError::malformed(FIELD_STAKE, "must be positive"));
        }
        if let Some(player) = players
            .iter()
            .find(|p| p.stats.days_played == 0 && p.stats.total_profit != 0)
        {
            return Err(LeagueError::malformed(
                format!("{FIELD_PLAYERS}.{}", player.name),
                "profit recorded without any day played",
            ));
        }

        Ok(Self {
            league_name,
            base_stake,
            players,
            sessions,
        })
    }

    /// Write the snapshot to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.serialize()?;
        std::fs::write(path, json).map_err(|source| LeagueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "league saved");
        Ok(())
    }

    /// Read a snapshot from `path`
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| LeagueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::deserialize(&contents)?;
        info!(
            path = %path.display(),
            players = store.players.len(),
            sessions = store.sessions.len(),
            "league loaded"
        );
        Ok(store)
    }

    /// Suggested snapshot file name, e.g. `Friday_League.json`
    pub fn file_stem(&self) -> String {
        self.league_name.replace(' ', "_")
    }
}

/// Fail on the first JSON object that repeats a key. Parsing into a `Value`
/// would keep only the last occurrence.
fn reject_duplicate_keys(blob: &str) -> Result<()> {
    let field = RefCell::new(None);
    let mut de = serde_json::Deserializer::from_str(blob);
    UniqueKeys {
        field: None,
        duplicate_in: &field,
    }
    .deserialize(&mut de)
    .map_err(|e| {
        let field = field.into_inner().unwrap_or_else(|| "<document>".to_string());
        LeagueError::malformed(field, e)
    })
}

/// Walks any JSON value, remembering the top-level field it is under
struct UniqueKeys<'a> {
    field: Option<&'a str>,
    duplicate_in: &'a RefCell<Option<String>>,
}

impl<'de> DeserializeSeed<'de> for UniqueKeys<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for UniqueKeys<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, _: bool) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_i64<E>(self, _: i64) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_u64<E>(self, _: u64) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_f64<E>(self, _: f64) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_str<E>(self, _: &str) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_unit<E>(self) -> std::result::Result<(), E> {
        Ok(())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<(), A::Error> {
        while seq
            .next_element_seed(UniqueKeys {
                field: self.field,
                duplicate_in: self.duplicate_in,
            })?
            .is_some()
        {}
        Ok(())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<(), A::Error> {
        let mut seen = HashSet::new();
        while let Some(key) = map.next_key::<String>()? {
            let field = self.field.unwrap_or(key.as_str());
            if seen.contains(&key) {
                *self.duplicate_in.borrow_mut() = Some(field.to_string());
                return Err(de::Error::custom(format!("duplicate key '{key}'")));
            }
            map.next_value_seed(UniqueKeys {
                field: Some(field),
                duplicate_in: self.duplicate_in,
            })?;
            seen.insert(key);
        }
        Ok(())
    }
}

fn take_field<T: DeserializeOwned>(doc: &mut Map<String, Value>, field: &str) -> Result<T> {
    let value = doc
        .remove(field)
        .ok_or_else(|| LeagueError::malformed(field, "missing"))?;
    serde_json::from_value(value).map_err(|e| LeagueError::malformed(field, e))
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
