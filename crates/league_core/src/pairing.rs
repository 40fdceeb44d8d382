//! Table draw by current standing
//!
//! Players are ranked by total profit and cut into consecutive tables, so the
//! leaders sit together, then the next group, and so on. Players who do not
//! fill a whole table are dealt one by one onto the existing tables from the
//! top. There is no memory of earlier draws.

use tracing::debug;

use crate::error::{LeagueError, Result};
use crate::types::{GroupSize, Table};

/// Split `standings` into tables of `group_size` (or one more).
///
/// `standings` yields `(name, total_profit)`. Equal profits keep the order
/// they were supplied in, so callers must iterate deterministically.
///
/// Fails with `InvalidGroupSize` when fewer than `group_size` players are
/// given, since no full table could be formed.
pub fn pair<'a, I>(standings: I, group_size: GroupSize) -> Result<Vec<Table>>
where
    I: IntoIterator<Item = (&'a str, i64)>,
{
    let mut ranked: Vec<(&str, i64)> = standings.into_iter().collect();
    // sort_by is stable: ties stay in input order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let size = group_size.get();
    let n = ranked.len();
    if n < size {
        return Err(LeagueError::InvalidGroupSize {
            requested: size,
            present: n,
        });
    }

    let full_tables = n / size;
    let seated = full_tables * size;

    let mut tables: Vec<Table> = ranked[..seated]
        .chunks(size)
        .map(|chunk| chunk.iter().map(|(name, _)| name.to_string()).collect())
        .collect();

    for (i, (name, _)) in ranked[seated..].iter().enumerate() {
        tables[i % full_tables].push(name.to_string());
    }
    debug!(players = n, full_tables, overflow = n - seated, "pairing computed");

    Ok(tables)
}

#[cfg(test)]
#[path = "pairing_tests.rs"]
mod pairing_tests;
