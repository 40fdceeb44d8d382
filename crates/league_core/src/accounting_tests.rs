use super::*;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn store_with(players: &[(&str, i64)]) -> LeagueStore {
    let mut store = LeagueStore::new();
    for (name, _) in players {
        store.add_player(name).unwrap();
    }
    // Seed standings through a settled day so profits are consistent with days played
    if players.iter().any(|(_, p)| *p != 0) {
        let results: Vec<ResultRow> = players
            .iter()
            .map(|(name, p)| ResultRow {
                name: name.to_string(),
                amount_on_table: 0,
                top_up: 0,
                profit: *p,
                table_number: 1,
            })
            .collect();
        let session = CommittedSession {
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            players: players.iter().map(|(n, _)| n.to_string()).collect(),
            group_size: GroupSize::Three,
            tables: vec![players.iter().map(|(n, _)| n.to_string()).collect()],
            results,
        };
        store.apply_session(session).unwrap();
    }
    store
}

#[test]
fn test_begin_draws_by_standing() {
    let store = store_with(&[("A", 100), ("B", 50), ("C", 0), ("D", -20), ("E", 30)]);
    let draft = DraftSession::begin(&store, &["A", "B", "C", "D", "E"], 3, day()).unwrap();

    assert_eq!(draft.tables(), &[vec!["A", "B", "E", "C", "D"]]);
    assert_eq!(draft.group_size(), GroupSize::Three);
    assert_eq!(draft.present_players().len(), 5);
    assert!(!draft.has_results());
}

#[test]
fn test_begin_refuses_bad_group_sizes() {
    let store = store_with(&[("A", 0), ("B", 0), ("C", 0)]);

    let err = DraftSession::begin(&store, &["A", "B", "C"], 4, day()).unwrap_err();
    assert!(matches!(err, LeagueError::InvalidGroupSize { requested: 4, present: 3 }));

    let err = DraftSession::begin(&store, &["A", "B", "C"], 2, day()).unwrap_err();
    assert!(matches!(err, LeagueError::InvalidGroupSize { requested: 2, .. }));

    let none: [&str; 0] = [];
    let err = DraftSession::begin(&store, &none, 3, day()).unwrap_err();
    assert!(matches!(err, LeagueError::InvalidGroupSize { present: 0, .. }));
}

#[test]
fn test_begin_refuses_unknown_and_repeated_players() {
    let store = store_with(&[("A", 0), ("B", 0), ("C", 0)]);

    let err = DraftSession::begin(&store, &["A", "B", "Ghost"], 3, day()).unwrap_err();
    assert!(matches!(err, LeagueError::UnknownPlayer(name) if name == "Ghost"));

    let err = DraftSession::begin(&store, &["A", "B", "A"], 3, day()).unwrap_err();
    assert!(matches!(err, LeagueError::DuplicatePlayer(name) if name == "A"));
}

#[test]
fn test_balanced_table_profits_sum_to_zero() {
    let store = store_with(&[("A", 0), ("B", 0), ("C", 0)]);
    let mut draft = DraftSession::begin(&store, &["A", "B", "C"], 3, day()).unwrap();
    draft.record_entry(0, "A", 130, 0).unwrap();
    draft.record_entry(0, "B", 90, 0).unwrap();
    draft.record_entry(0, "C", 80, 0).unwrap();

    let report = draft.table_report(0, 100).unwrap();
    assert!(report.check.is_balanced());
    let profits: Vec<i64> = report.rows.iter().map(|r| r.profit).collect();
    assert_eq!(profits, [30, -10, -20]);
    assert_eq!(table_profit_sum(&report.rows), 0);
    assert_eq!(report.best_profit(), Some(30));
    assert_eq!(report.worst_profit(), Some(-20));
}

#[test]
fn test_top_ups_count_towards_the_pot() {
    let store = store_with(&[("A", 0), ("B", 0), ("C", 0)]);
    let mut draft = DraftSession::begin(&store, &["A", "B", "C"], 3, day()).unwrap();
    draft.record_entry(0, "A", 250, 0).unwrap();
    draft.record_entry(0, "B", 0, 50).unwrap();
    draft.record_entry(0, "C", 100, 0).unwrap();

    let check = draft.validate_table(0, 100).unwrap();
    assert_eq!(check.difference, 300 + 50 - 350);
    assert!(check.is_balanced());

    let report = draft.table_report(0, 100).unwrap();
    assert_eq!(report.rows[1].profit, -150);
    assert_eq!(table_profit_sum(&report.rows), 0);
}

#[test]
fn test_difference_reports_missing_and_surplus_cash() {
    let store = store_with(&[("A", 0), ("B", 0), ("C", 0)]);
    let mut draft = DraftSession::begin(&store, &["A", "B", "C"], 3, day()).unwrap();

    // Nothing entered: all stakes missing
    assert_eq!(draft.validate_table(0, 100).unwrap().difference, 300);

    draft.record_entry(0, "A", 400, 0).unwrap();
    assert_eq!(draft.validate_table(0, 100).unwrap().difference, -100);
}

#[test]
fn test_record_entry_replaces_previous_value() {
    let store = store_with(&[("A", 0), ("B", 0), ("C", 0)]);
    let mut draft = DraftSession::begin(&store, &["A", "B", "C"], 3, day()).unwrap();
    draft.record_entry(0, "A", 10, 5).unwrap();
    draft.record_entry(0, "A", 20, 0).unwrap();
    assert_eq!(
        draft.entry(0, "A").unwrap(),
        SeatEntry {
            amount_on_table: 20,
            top_up: 0
        }
    );
    assert!(draft.has_results());
}

#[test]
fn test_record_entry_checks_table_and_seat() {
    let store = store_with(&[("A", 0), ("B", 0), ("C", 0)]);
    let mut draft = DraftSession::begin(&store, &["A", "B", "C"], 3, day()).unwrap();

    assert!(matches!(draft.record_entry(1, "A", 0, 0), Err(LeagueError::UnknownTable(2))));
    assert!(matches!(
        draft.record_entry(0, "Ghost", 0, 0),
        Err(LeagueError::NotSeated { table: 1, .. })
    ));
    assert!(!draft.has_results());
}

#[test]
fn test_start_result_entry_keeps_existing_entries() {
    let store = store_with(&[("A", 0), ("B", 0), ("C", 0)]);
    let mut draft = DraftSession::begin(&store, &["A", "B", "C"], 3, day()).unwrap();
    draft.start_result_entry();
    assert!(draft.has_results());
    draft.record_entry(0, "B", 120, 0).unwrap();
    draft.start_result_entry();
    assert_eq!(draft.entry(0, "B").unwrap().amount_on_table, 120);
}

#[test]
fn test_settle_produces_rows_with_table_numbers() {
    let store = store_with(&[("A", 0), ("B", 0), ("C", 0), ("D", 0), ("E", 0), ("F", 0)]);
    let mut draft = DraftSession::begin(&store, &["A", "B", "C", "D", "E", "F"], 3, day()).unwrap();
    for (table, seats) in draft.tables().to_vec().iter().enumerate() {
        for name in seats {
            draft.record_entry(table, name, 100, 0).unwrap();
        }
    }

    let session = draft.settle(&store).unwrap();
    assert_eq!(session.results.len(), 6);
    assert_eq!(session.tables.len(), 2);
    assert_eq!(session.table_rows(1).count(), 3);
    assert_eq!(session.table_rows(2).count(), 3);
    assert!(session.results.iter().all(|r| r.profit == 0));
    assert_eq!(session.date, day());
}

#[test]
fn test_settle_refuses_any_unbalanced_table() {
    let store = store_with(&[("A", 0), ("B", 0), ("C", 0), ("D", 0), ("E", 0), ("F", 0)]);
    let mut draft = DraftSession::begin(&store, &["A", "B", "C", "D", "E", "F"], 3, day()).unwrap();
    let tables = draft.tables().to_vec();
    for name in &tables[0] {
        draft.record_entry(0, name, 100, 0).unwrap();
    }
    draft.record_entry(1, &tables[1][0], 100, 0).unwrap();
    draft.record_entry(1, &tables[1][1], 100, 0).unwrap();
    draft.record_entry(1, &tables[1][2], 90, 0).unwrap();

    let err = draft.settle(&store).unwrap_err();
    assert!(matches!(err, LeagueError::UnbalancedTable { table: 2, difference: 10 }));
}

#[test]
fn test_settle_catches_player_removed_mid_draft() {
    let mut store = store_with(&[("A", 0), ("B", 0), ("C", 0)]);
    let mut draft = DraftSession::begin(&store, &["A", "B", "C"], 3, day()).unwrap();
    for name in ["A", "B", "C"] {
        draft.record_entry(0, name, 100, 0).unwrap();
    }
    store.remove_player("B").unwrap();

    let err = draft.settle(&store).unwrap_err();
    assert!(matches!(err, LeagueError::UnknownPlayer(name) if name == "B"));
}

#[test]
fn test_settle_uses_current_stake() {
    let mut store = store_with(&[("A", 0), ("B", 0), ("C", 0)]);
    let mut draft = DraftSession::begin(&store, &["A", "B", "C"], 3, day()).unwrap();
    for name in ["A", "B", "C"] {
        draft.record_entry(0, name, 50, 0).unwrap();
    }
    assert!(draft.settle(&store).is_err());

    store.set_config(None, Some(50)).unwrap();
    assert!(draft.settle(&store).is_ok());
}
