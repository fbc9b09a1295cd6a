//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;

use spendrank_core::test_utils::{at, two_user_market, write_store, RecordBuilder};
use spendrank_core::{Category, Error, Ledger};
use tempfile::TempDir;

use crate::commands;

fn setup_ledger() -> (TempDir, Ledger) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_store(dir.path(), &two_user_market());
    let ledger = Ledger::open(&path).unwrap();
    (dir, ledger)
}

fn reference() -> chrono::DateTime<chrono::Utc> {
    at(2019, 2, 15)
}

// ========== Rank Command Tests ==========

#[test]
fn test_cmd_rank_two_users() {
    let (_dir, ledger) = setup_ledger();

    let report =
        commands::cmd_rank(&ledger, "A", "grocery", "m", None, reference()).unwrap();
    assert_eq!(report.user_spent_ratio, 0.1);
    assert_eq!(report.user_rank, Some(2));
    assert_eq!(report.num_users, 2);
    assert_eq!(report.top_users, vec!["B", "A"]);
    assert_eq!(report.top_spent_ratios, vec![0.2, 0.1]);
    assert_eq!(report.display_entries.len(), 2);
    assert_eq!(report.display_entries[0].name, "Bob");
    assert_eq!(report.display_entries[1].name, "Alice");
    assert_eq!(report.top_percent, Some(100.0));
}

#[test]
fn test_cmd_rank_json_shape() {
    let (_dir, ledger) = setup_ledger();

    let report =
        commands::cmd_rank(&ledger, "B", "grocery", "monthly", None, reference()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["userRank"], 1);
    assert_eq!(json["numUsers"], 2);
    assert_eq!(json["topUsers"][0], "B");
    assert_eq!(json["displayEntries"][0]["name"], "Bob");
    assert!(json.get("refTime").is_some());
}

#[test]
fn test_cmd_rank_unknown_user() {
    let (_dir, ledger) = setup_ledger();

    let err = commands::cmd_rank(&ledger, "nobody", "grocery", "m", None, reference())
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::UnknownUser(id)) if id == "nobody"
    ));
}

#[test]
fn test_cmd_rank_known_user_without_spend() {
    let (_dir, ledger) = setup_ledger();

    // Known user, but nothing in travel this month
    let report = commands::cmd_rank(&ledger, "A", "travel", "m", None, reference()).unwrap();
    assert_eq!(report.user_rank, None);
    assert_eq!(report.user_spent_ratio, 0.0);
    assert_eq!(report.num_users, 0);
    assert!(report.top_users.is_empty());
    assert!(report.display_entries.is_empty());
}

#[test]
fn test_cmd_rank_invalid_inputs() {
    let (_dir, ledger) = setup_ledger();

    let err = commands::cmd_rank(&ledger, "A", "groceries", "m", None, reference()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InvalidCategory(_))
    ));

    let err = commands::cmd_rank(&ledger, "A", "grocery", "y", None, reference()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InvalidTimeframe(_))
    ));
}

#[test]
fn test_cmd_rank_state_filter() {
    let dir = tempfile::tempdir().unwrap();
    let mut records = two_user_market();
    records.push(
        RecordBuilder::new("C", 60_000.0)
            .state("CA")
            .spend(4_000.0),
    );
    let path = write_store(dir.path(), &records);
    let ledger = Ledger::open(&path).unwrap();

    let all = commands::cmd_rank(&ledger, "A", "grocery", "m", None, reference()).unwrap();
    assert_eq!(all.user_rank, Some(3));

    let ny = commands::cmd_rank(&ledger, "A", "grocery", "m", Some("ny"), reference()).unwrap();
    assert_eq!(ny.user_rank, Some(2));
    assert_eq!(ny.num_users, 2);
}

#[test]
fn test_cmd_rank_reference_out_of_range() {
    let (_dir, ledger) = setup_ledger();
    let config = spendrank_core::Config::default();

    // Earliest instant chrono represents; parses, but no window fits before it
    let reference = commands::resolve_reference(&config, Some("-8334601228800")).unwrap();
    let err = commands::cmd_rank(&ledger, "A", "grocery", "d", None, reference).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InvalidData(_))
    ));

    let result = commands::cmd_history(&ledger, "A", "grocery", "d", None, reference, 3);
    assert!(result.is_err());
}

// ========== History Command Tests ==========

#[test]
fn test_cmd_history() {
    let (_dir, ledger) = setup_ledger();

    let report =
        commands::cmd_history(&ledger, "A", "grocery", "m", None, reference(), 3).unwrap();
    assert_eq!(report.rank_series.len(), 1);
    assert_eq!(report.rank_series.get(&reference()), Some(&2));
    assert_eq!(report.ratio_series.get(&reference()), Some(&0.1));
    assert_eq!(report.raw_series[&reference()].len(), 1);
    assert_eq!(report.raw_series[&reference()][0].amount, 1_000.0);
}

#[test]
fn test_cmd_history_unknown_user() {
    let (_dir, ledger) = setup_ledger();

    let result = commands::cmd_history(&ledger, "Z", "grocery", "m", None, reference(), 3);
    assert!(result.is_err());
}

// ========== Breakdown Command Tests ==========

#[test]
fn test_cmd_breakdown() {
    let (_dir, ledger) = setup_ledger();

    let report = commands::cmd_breakdown(&ledger, "B", "m", reference()).unwrap();
    assert_eq!(report.by_category.get(&Category::Grocery), Some(&1_000.0));
    assert_eq!(report.total, 1_000.0);
    assert_eq!(report.budget, 5_000.0);
    assert_eq!(report.budget_delta, 4_000.0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["byCategory"]["grocery"], 1_000.0);
    assert_eq!(json["budgetDelta"], 4_000.0);
}

#[test]
fn test_cmd_breakdown_unknown_user() {
    let (_dir, ledger) = setup_ledger();
    assert!(commands::cmd_breakdown(&ledger, "Z", "m", reference()).is_err());
}

// ========== Append Command Tests ==========

#[test]
fn test_cmd_append_then_rank() {
    let (_dir, ledger) = setup_ledger();

    let report = commands::cmd_append(
        &ledger,
        "A",
        "grocery",
        2_000.0,
        "NY",
        Some("2019-02-12"),
        reference(),
    )
    .unwrap();
    assert_eq!(report.appended.salary, 120_000.0);
    assert_eq!(report.appended.name, "Alice");
    assert_eq!(report.appended.timestamp, at(2019, 2, 12));
    assert_eq!(report.records, 3);

    // A now spends 3000 of 10000, ahead of B's 0.2
    let rank = commands::cmd_rank(&ledger, "A", "grocery", "m", None, reference()).unwrap();
    assert_eq!(rank.user_spent_ratio, 0.3);
    assert_eq!(rank.user_rank, Some(1));
}

#[test]
fn test_cmd_append_defaults_to_reference_time() {
    let (_dir, ledger) = setup_ledger();

    let report =
        commands::cmd_append(&ledger, "B", "travel", 10.0, "CA", None, reference()).unwrap();
    assert_eq!(report.appended.timestamp, reference());
}

#[test]
fn test_cmd_append_persists() {
    let (dir, ledger) = setup_ledger();
    commands::cmd_append(&ledger, "B", "home", 42.0, "NY", None, reference()).unwrap();

    let reopened = Ledger::open(dir.path().join("store.csv")).unwrap();
    assert_eq!(reopened.snapshot().len(), 3);
}

#[test]
fn test_cmd_append_rejects_bad_input() {
    let (dir, ledger) = setup_ledger();
    let before = fs::read_to_string(dir.path().join("store.csv")).unwrap();

    assert!(commands::cmd_append(&ledger, "Z", "grocery", 1.0, "NY", None, reference()).is_err());
    assert!(commands::cmd_append(&ledger, "A", "grocery", -1.0, "NY", None, reference()).is_err());
    assert!(commands::cmd_append(&ledger, "A", "gadgets", 1.0, "NY", None, reference()).is_err());
    assert!(
        commands::cmd_append(&ledger, "A", "grocery", 1.0, "NY", Some("soon"), reference())
            .is_err()
    );

    let after = fs::read_to_string(dir.path().join("store.csv")).unwrap();
    assert_eq!(before, after);
    assert_eq!(ledger.snapshot().len(), 2);
}

// ========== Status Command Tests ==========

#[test]
fn test_cmd_status() {
    let (_dir, ledger) = setup_ledger();

    let before = commands::cmd_status(&ledger).unwrap();
    assert_eq!(before.records, 2);
    assert_eq!(before.users, 2);
    assert!(before.path.ends_with("store.csv"));

    commands::cmd_append(&ledger, "A", "misc", 5.0, "NY", None, reference()).unwrap();
    let after = commands::cmd_status(&ledger).unwrap();
    assert_eq!(after.records, 3);
    assert!(after.version > before.version);
    assert_ne!(after.fingerprint, before.fingerprint);
}

#[test]
fn test_cmd_status_in_memory() {
    let ledger = Ledger::in_memory(two_user_market());
    let report = commands::cmd_status(&ledger).unwrap();
    assert_eq!(report.path, ":memory:");
}

// ========== Config Helper Tests ==========

#[test]
fn test_load_config_store_flag_wins() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        "store_path = \"from-file.csv\"\nhistory_buckets = 4\n",
    )
    .unwrap();

    let from_file = commands::load_config(None, Some(&config_path)).unwrap();
    assert_eq!(from_file.history_buckets, 4);

    let flag = dir.path().join("flag.csv");
    let config = commands::load_config(Some(&flag), Some(&config_path)).unwrap();
    assert_eq!(config.store_path, flag);
    assert_eq!(config.history_buckets, 4);
}

#[test]
fn test_load_config_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(commands::load_config(None, Some(&missing)).is_err());
}

#[test]
fn test_open_ledger_missing_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = commands::load_config(Some(&dir.path().join("missing.csv")), None).unwrap();
    assert!(commands::open_ledger(&config).is_err());
}

#[test]
fn test_resolve_reference() {
    let config = spendrank_core::Config::default();

    assert_eq!(
        commands::resolve_reference(&config, None).unwrap(),
        config.reference_time
    );
    assert_eq!(
        commands::resolve_reference(&config, Some("2019-01-01")).unwrap(),
        at(2019, 1, 1)
    );
    assert_eq!(
        commands::resolve_reference(&config, Some("1550188800")).unwrap(),
        at(2019, 2, 15)
    );
    assert!(commands::resolve_reference(&config, Some("yesterday")).is_err());
}
