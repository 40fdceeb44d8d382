//! Failure taxonomy shared by every league operation

use std::path::PathBuf;

use thiserror::Error;

/// Recoverable failures surfaced to the operator.
///
/// Every variant names the offending player, table or file field so the
/// caller can prompt for a correction. Tables are reported by their 1-based
/// number, the way they are announced at the venue.
#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("player '{0}' already exists")]
    DuplicatePlayer(String),

    #[error("unknown player '{0}'")]
    UnknownPlayer(String),

    #[error("malformed league file: field '{field}': {reason}")]
    MalformedLeagueFile { field: String, reason: String },

    #[error("invalid group size {requested} for {present} present players (must be 3 or 4 and at most the number present)")]
    InvalidGroupSize { requested: usize, present: usize },

    #[error("table {table} does not balance: difference {difference}")]
    UnbalancedTable { table: usize, difference: i64 },

    #[error("no play day is in progress")]
    NoDraft,

    #[error("there is no table {0}")]
    UnknownTable(usize),

    #[error("player '{player}' is not seated at table {table}")]
    NotSeated { player: String, table: usize },

    #[error("base stake must be positive, got {0}")]
    InvalidStake(u32),

    #[error("player name must not be empty")]
    EmptyName,

    #[error("statistics of player '{0}' are out of range")]
    StatsOverflow(String),

    #[error("failed to encode league: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LeagueError {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedLeagueFile {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LeagueError>;
