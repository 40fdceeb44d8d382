//! Leaderboard and standings export

use serde::Serialize;

use crate::roster::Roster;
use crate::types::CommittedSession;

/// Default column separator of the standings export
pub const EXPORT_DELIMITER: char = ';';

const EXPORT_HEADER: [&str; 5] = ["Rank", "Name", "TotalProfit", "DaysPlayed", "AverageProfit"];

/// One line of the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    /// 1-based, no shared ranks
    pub rank: usize,
    pub name: String,
    pub total_profit: i64,
    pub days_played: u32,
    pub average_profit: f64,
}

/// Rank every player by total profit, highest first.
///
/// Ties keep roster order. Computed fresh on every call.
pub fn leaderboard(players: &Roster) -> Vec<Standing> {
    let mut ranked: Vec<_> = players.iter().collect();
    ranked.sort_by(|a, b| b.stats.total_profit.cmp(&a.stats.total_profit));

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, player)| Standing {
            rank: i + 1,
            name: player.name.clone(),
            total_profit: player.stats.total_profit,
            days_played: player.stats.days_played,
            average_profit: player.stats.average_profit(),
        })
        .collect()
}

/// Delimited export of a leaderboard: header plus one row per player,
/// averages rounded to 2 decimals.
///
/// Names containing the delimiter, quotes or line breaks are quoted.
pub fn export_delimited(standings: &[Standing], delimiter: char) -> String {
    let sep = delimiter.to_string();
    let sep = sep.as_str();
    let mut out = String::new();
    out.push_str(&EXPORT_HEADER.join(sep));
    out.push('\n');

    for s in standings {
        let fields = [
            s.rank.to_string(),
            quote_field(&s.name, delimiter),
            s.total_profit.to_string(),
            s.days_played.to_string(),
            format!("{:.2}", s.average_profit),
        ];
        out.push_str(&fields.join(sep));
        out.push('\n');
    }
    out
}

fn quote_field(field: &str, delimiter: char) -> String {
    if field.contains(delimiter) || field.contains(['"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Generate a text leaderboard for terminals
pub fn render_leaderboard(league_name: &str, standings: &[Standing]) -> String {
    let mut report = String::new();
    report.push_str(&format!("=== {} ===\n", league_name));
    report.push_str(&format!(
        "{:>4}  {:<24} {:>10} {:>6} {:>10}\n",
        "#", "Player", "Profit", "Days", "Average"
    ));
    report.push_str(&"-".repeat(58));
    report.push('\n');
    for s in standings {
        report.push_str(&format!(
            "{:>4}  {:<24} {:>10} {:>6} {:>10.2}\n",
            s.rank, s.name, s.total_profit, s.days_played, s.average_profit
        ));
    }
    report
}

/// Settled play days, most recent first
pub fn history(sessions: &[CommittedSession]) -> impl Iterator<Item = &CommittedSession> {
    sessions.iter().rev()
}

/// Generate a text summary of one settled play day, best result first
pub fn render_session(number: usize, session: &CommittedSession) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "Play day {} - {} ({} players, {} tables)\n",
        number,
        session.date,
        session.players.len(),
        session.tables.len()
    ));
    report.push_str(&format!(
        "  {:<24} {:>8} {:>8} {:>8} {:>6}\n",
        "Player", "On table", "Top-up", "Profit", "Table"
    ));
    for row in session.rows_by_profit() {
        report.push_str(&format!(
            "  {:<24} {:>8} {:>8} {:>8} {:>6}\n",
            row.name, row.amount_on_table, row.top_up, row.profit, row.table_number
        ));
    }
    report
}

#[cfg(test)]
#[path = "standings_tests.rs"]
mod standings_tests;
