//! Bookkeeping for a recurring card league
//!
//! This crate provides:
//! - A league store with players, committed play days and configuration
//! - Table draws ordered by current standing
//! - Play-day settlement with per-table money conservation checks
//! - Leaderboards and delimited standings export
//!
//! # Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use league_core::League;
//!
//! let mut league = League::new();
//! for name in ["Anna", "Bert", "Cyril"] {
//!     league.add_player(name).unwrap();
//! }
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! league.begin_draft(&["Anna", "Bert", "Cyril"], 3, date).unwrap();
//! league.record_table_entry(0, "Anna", 130, 0).unwrap();
//! league.record_table_entry(0, "Bert", 90, 0).unwrap();
//! league.record_table_entry(0, "Cyril", 80, 0).unwrap();
//! league.commit().unwrap();
//!
//! assert_eq!(league.leaderboard()[0].name, "Anna");
//! ```

mod accounting;
mod error;
mod league;
mod pairing;
mod roster;
mod standings;
mod store;
mod types;

pub use accounting::*;
pub use error::*;
pub use league::*;
pub use pairing::*;
pub use roster::*;
pub use standings::*;
pub use store::*;
pub use types::*;
