use super::*;
use crate::types::{GroupSize, Player, PlayerStats, ResultRow};
use chrono::NaiveDate;

fn roster(players: &[(&str, i64, u32)]) -> Roster {
    let mut roster = Roster::new();
    for (name, total_profit, days_played) in players {
        roster.insert(Player {
            name: name.to_string(),
            stats: PlayerStats {
                total_profit: *total_profit,
                days_played: *days_played,
            },
        });
    }
    roster
}

#[test]
fn test_ties_keep_roster_order_with_distinct_ranks() {
    let board = leaderboard(&roster(&[("A", 150, 3), ("B", 150, 5)]));

    assert_eq!(board.len(), 2);
    assert_eq!((board[0].rank, board[0].name.as_str()), (1, "A"));
    assert_eq!((board[1].rank, board[1].name.as_str()), (2, "B"));
    assert!((board[0].average_profit - 50.0).abs() < 1e-9);
    assert!((board[1].average_profit - 30.0).abs() < 1e-9);
}

#[test]
fn test_sorted_by_total_profit_descending() {
    let board = leaderboard(&roster(&[("Low", -40, 2), ("New", 0, 0), ("High", 90, 2)]));
    let names: Vec<_> = board.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["High", "New", "Low"]);
    assert_eq!(board[1].average_profit, 0.0);
    assert_eq!(board.iter().map(|s| s.rank).collect::<Vec<_>>(), [1, 2, 3]);
}

#[test]
fn test_empty_roster_gives_empty_board() {
    assert!(leaderboard(&Roster::new()).is_empty());
}

#[test]
fn test_export_rounds_average_to_two_decimals() {
    let board = leaderboard(&roster(&[("A", 100, 3), ("B", -7, 2)]));
    let csv = export_delimited(&board, EXPORT_DELIMITER);
    assert_eq!(
        csv,
        "Rank;Name;TotalProfit;DaysPlayed;AverageProfit\n1;A;100;3;33.33\n2;B;-7;2;-3.50\n"
    );
}

#[test]
fn test_export_quotes_awkward_names() {
    let board = leaderboard(&roster(&[("Smith; John", 0, 0), ("\"Ace\"", 0, 0)]));
    let csv = export_delimited(&board, ';');
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines[1], "1;\"Smith; John\";0;0;0.00");
    assert_eq!(lines[2], "2;\"\"\"Ace\"\"\";0;0;0.00");

    let csv = export_delimited(&board, ',');
    assert!(csv.starts_with("Rank,Name,"));
    assert!(csv.contains("\n1,Smith; John,0,0,0.00\n"));
}

#[test]
fn test_render_leaderboard_lists_every_player() {
    let board = leaderboard(&roster(&[("Anna", 20, 1), ("Bert", -20, 1)]));
    let text = render_leaderboard("Friday League", &board);
    assert!(text.starts_with("=== Friday League ==="));
    assert!(text.contains("Anna"));
    assert!(text.contains("Bert"));
    assert!(text.contains("-20.00"));
}

#[test]
fn test_history_is_newest_first() {
    let session = |day| CommittedSession {
        date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
        players: vec!["A".into(), "B".into(), "C".into()],
        group_size: GroupSize::Three,
        tables: vec![vec!["A".into(), "B".into(), "C".into()]],
        results: vec![
            ResultRow::settle("A", 100, 0, 100, 1),
            ResultRow::settle("B", 150, 0, 100, 1),
            ResultRow::settle("C", 50, 0, 100, 1),
        ],
    };
    let sessions = vec![session(1), session(8)];

    let dates: Vec<_> = history(&sessions).map(|s| s.date.to_string()).collect();
    assert_eq!(dates, ["2024-04-08", "2024-04-01"]);

    let text = render_session(1, &sessions[1]);
    assert!(text.starts_with("Play day 1 - 2024-04-08 (3 players, 1 tables)"));
    let b = text.find("  B ").unwrap();
    let c = text.find("  C ").unwrap();
    assert!(b < c, "best result listed first");
}
