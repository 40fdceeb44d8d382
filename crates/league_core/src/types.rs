//! Records shared by the store, the draw and the settlement

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stake charged to every player per play day in a fresh league
pub const DEFAULT_BASE_STAKE: u32 = 100;

/// Name given to a fresh league
pub const DEFAULT_LEAGUE_NAME: &str = "Card League";

/// A table as announced: player names in seating order
pub type Table = Vec<String>;

/// Number of players seated at a table before overflow is distributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GroupSize {
    Three,
    Four,
}

impl GroupSize {
    pub fn new(size: usize) -> Option<Self> {
        match size {
            3 => Some(Self::Three),
            4 => Some(Self::Four),
            _ => None,
        }
    }

    pub fn get(self) -> usize {
        match self {
            Self::Three => 3,
            Self::Four => 4,
        }
    }
}

impl TryFrom<u8> for GroupSize {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value as usize).ok_or_else(|| format!("group size must be 3 or 4, got {value}"))
    }
}

impl From<GroupSize> for u8 {
    fn from(size: GroupSize) -> Self {
        size.get() as u8
    }
}

/// Cumulative results of one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlayerStats {
    pub total_profit: i64,
    pub days_played: u32,
}

impl PlayerStats {
    /// Mean profit per play day, 0 for a player who has not played yet
    pub fn average_profit(&self) -> f64 {
        if self.days_played == 0 {
            return 0.0;
        }
        self.total_profit as f64 / self.days_played as f64
    }
}

/// A registered player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub stats: PlayerStats,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            stats: PlayerStats::default(),
        }
    }
}

/// League-wide settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueConfig {
    pub league_name: String,
    pub base_stake: u32,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            league_name: DEFAULT_LEAGUE_NAME.to_string(),
            base_stake: DEFAULT_BASE_STAKE,
        }
    }
}

/// One settled line of a play day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResultRow {
    pub name: String,
    pub amount_on_table: u32,
    pub top_up: u32,
    pub profit: i64,
    /// 1-based
    pub table_number: usize,
}

impl ResultRow {
    pub fn settle(name: &str, amount_on_table: u32, top_up: u32, base_stake: u32, table_number: usize) -> Self {
        Self {
            name: name.to_string(),
            amount_on_table,
            top_up,
            profit: profit(amount_on_table, top_up, base_stake),
            table_number,
        }
    }
}

/// Profit of a single seat: what is left on the table minus everything put in
pub fn profit(amount_on_table: u32, top_up: u32, base_stake: u32) -> i64 {
    i64::from(amount_on_table) - i64::from(base_stake) - i64::from(top_up)
}

/// A play day that has been settled and appended to history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CommittedSession {
    pub date: NaiveDate,
    pub players: Vec<String>,
    pub group_size: GroupSize,
    pub tables: Vec<Table>,
    pub results: Vec<ResultRow>,
}

impl CommittedSession {
    /// Result rows, highest profit first
    pub fn rows_by_profit(&self) -> Vec<&ResultRow> {
        let mut rows: Vec<_> = self.results.iter().collect();
        rows.sort_by(|a, b| b.profit.cmp(&a.profit));
        rows
    }

    /// Rows of one table, 1-based like `ResultRow::table_number`
    pub fn table_rows(&self, table_number: usize) -> impl Iterator<Item = &ResultRow> {
        self.results
            .iter()
            .filter(move |row| row.table_number == table_number)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
