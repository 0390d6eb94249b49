use fairsplit::config::Config;
use fairsplit::core::currency::CurrencyCode;
use fairsplit::core::entry::{Expense, LedgerEntry};
use fairsplit::core::error::LedgerError;
use fairsplit::core::member::MemberId;
use fairsplit::optimization::balance_engine::BalanceEngine;
use fairsplit::optimization::settlement::SettlementPlanner;
use fairsplit::shell::Shell;
use fairsplit::storage::group_store::GroupStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use uuid::Uuid;

fn temp_store_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("fairsplit-{}", Uuid::new_v4()))
        .join("groups.json")
}

fn members(names: &[&str]) -> Vec<MemberId> {
    names.iter().map(|n| MemberId::new(*n)).collect()
}

fn render_all(store: &GroupStore, group: &str) -> Vec<String> {
    let eur = CurrencyCode::new("EUR");
    store
        .settle(group, &SettlementPlanner::new())
        .unwrap()
        .settlements()
        .iter()
        .map(|s| s.render(&eur))
        .collect()
}

/// Full pipeline: store → expense → balances → settlements → payment → settlements.
#[test]
fn trip_scenario_end_to_end() {
    let mut store = GroupStore::in_memory();
    store.create_group("Trip", members(&["A", "B", "C"])).unwrap();
    store
        .add_expense("Trip", &MemberId::new("A"), dec!(90), "Hotel", None)
        .unwrap();

    let balances = store.balances("Trip").unwrap();
    assert_eq!(balances.get(&MemberId::new("A")), dec!(60));
    assert_eq!(balances.get(&MemberId::new("B")), dec!(-30));
    assert_eq!(balances.get(&MemberId::new("C")), dec!(-30));

    let mut rendered = render_all(&store, "Trip");
    rendered.sort();
    assert_eq!(rendered, vec!["B owes A: 30.00 EUR", "C owes A: 30.00 EUR"]);

    store
        .record_payment("Trip", &MemberId::new("B"), &MemberId::new("A"), dec!(30))
        .unwrap();
    let balances = store.balances("Trip").unwrap();
    assert_eq!(balances.get(&MemberId::new("A")), dec!(30));
    assert_eq!(balances.get(&MemberId::new("B")), Decimal::ZERO);
    assert_eq!(balances.get(&MemberId::new("C")), dec!(-30));
    assert_eq!(render_all(&store, "Trip"), vec!["C owes A: 30.00 EUR"]);
}

/// Groups survive a reopen of the store file.
#[test]
fn store_persists_across_reopen() {
    let path = temp_store_path();
    {
        let mut store = GroupStore::open(&path);
        assert!(store.is_empty());
        store.create_group("Flat", members(&["Ann", "Ben"])).unwrap();
        store
            .add_expense("Flat", &MemberId::new("Ann"), dec!(12.50), "Milk", None)
            .unwrap();
        store
            .record_payment("Flat", &MemberId::new("Ben"), &MemberId::new("Ann"), dec!(6.25))
            .unwrap();
    }

    let reopened = GroupStore::open(&path);
    let group = reopened.group("Flat").unwrap();
    assert_eq!(group.members(), members(&["Ann", "Ben"]).as_slice());
    assert_eq!(group.entries().len(), 2);
    assert!(matches!(group.entries()[0], LedgerEntry::Expense(_)));
    assert!(matches!(group.entries()[1], LedgerEntry::Payment(_)));

    let balances = reopened.balances("Flat").unwrap();
    assert!(balances.iter().all(|(_, b)| b == Decimal::ZERO));

    fs::remove_dir_all(path.parent().unwrap()).ok();
}

/// The on-disk shape is an object keyed by group name.
#[test]
fn store_file_layout() {
    let path = temp_store_path();
    let mut store = GroupStore::open(&path);
    store.create_group("Trip", members(&["A", "B"])).unwrap();
    store
        .add_expense("Trip", &MemberId::new("A"), dec!(10), "Tea", None)
        .unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let trip = &json["Trip"];
    assert_eq!(trip["name"], "Trip");
    assert!(trip["id"].is_string());
    assert_eq!(trip["members"], serde_json::json!(["A", "B"]));
    assert_eq!(trip["expenses"][0]["type"], "expense");
    assert_eq!(trip["expenses"][0]["paid_by"], "A");
    let share: Decimal = trip["expenses"][0]["splits"]["B"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(share, dec!(5));

    fs::remove_dir_all(path.parent().unwrap()).ok();
}

/// A corrupt store opens as empty state instead of failing.
#[test]
fn corrupt_store_recovers_empty() {
    let path = temp_store_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{ this is not json").unwrap();

    let mut store = GroupStore::open(&path);
    assert!(store.is_empty());
    store.create_group("Fresh", members(&["X"])).unwrap();

    let reopened = GroupStore::open(&path);
    assert!(reopened.group("Fresh").is_ok());

    fs::remove_dir_all(path.parent().unwrap()).ok();
}

/// Explicit shares flow through the store and the balance engine.
#[test]
fn explicit_shares_through_store() {
    let mut store = GroupStore::in_memory();
    let group_id = store
        .create_group("Dinner", members(&["A", "B", "C"]))
        .unwrap()
        .id();
    let expense = Expense::with_splits(
        group_id,
        MemberId::new("B"),
        dec!(100),
        "Tasting menu",
        vec![
            (MemberId::new("A"), dec!(50)),
            (MemberId::new("B"), dec!(20)),
            (MemberId::new("C"), dec!(30)),
        ],
    )
    .unwrap();
    store.add_prepared_expense("Dinner", expense).unwrap();

    let balances = store.balances("Dinner").unwrap();
    assert_eq!(balances.get(&MemberId::new("A")), dec!(-50));
    assert_eq!(balances.get(&MemberId::new("B")), dec!(80));
    assert_eq!(balances.get(&MemberId::new("C")), dec!(-30));
}

/// Boundary errors leave the store untouched.
#[test]
fn boundary_errors_are_reported() {
    let mut store = GroupStore::in_memory();
    store.create_group("Trip", members(&["A", "B"])).unwrap();

    assert!(matches!(
        store.create_group("Trip", members(&["C"])),
        Err(LedgerError::DuplicateGroup(_))
    ));
    assert!(matches!(
        store.add_expense("Nowhere", &MemberId::new("A"), dec!(1), "x", None),
        Err(LedgerError::GroupNotFound(_))
    ));
    assert!(matches!(
        store.add_expense("Trip", &MemberId::new("Z"), dec!(1), "x", None),
        Err(LedgerError::UnknownMember { .. })
    ));
    assert!(matches!(
        store.record_payment("Trip", &MemberId::new("A"), &MemberId::new("B"), Decimal::ZERO),
        Err(LedgerError::InvalidAmount(_))
    ));
    assert!(store.group("Trip").unwrap().entries().is_empty());
}

/// Balances computed directly from a group match the store's view.
#[test]
fn engine_matches_store() {
    let mut store = GroupStore::in_memory();
    store.create_group("Trip", members(&["A", "B", "C", "D"])).unwrap();
    store
        .add_expense("Trip", &MemberId::new("D"), dec!(100), "Boat", None)
        .unwrap();
    store
        .add_expense(
            "Trip",
            &MemberId::new("A"),
            dec!(33.33),
            "Ice cream",
            Some(members(&["B", "C"])),
        )
        .unwrap();

    let group = store.group("Trip").unwrap();
    let direct = BalanceEngine::compute_balances(group).unwrap();
    assert_eq!(direct, store.balances("Trip").unwrap());
    assert!(direct.is_balanced());
}

fn run_shell(script: &str) -> (GroupStore, String) {
    let mut shell = Shell::new(
        GroupStore::in_memory(),
        Config::default(),
        Cursor::new(script.to_string()),
        Vec::new(),
    );
    shell.run().unwrap();
    let (store, output) = shell.into_parts();
    (store, String::from_utf8(output).unwrap())
}

/// A scripted session covering every menu action.
#[test]
fn shell_session_full_flow() {
    let script = "\
1\nTrip\nA, B, C\n\n\
2\nTrip\nA\n90\nHotel\n\n\n\
3\nTrip\n\n\
4\nTrip\n\n\
5\nTrip\nB\nA\n30\n\n\
4\nTrip\n\n\
6\n\n\
7\n";
    let (store, output) = run_shell(script);

    assert!(output.contains("Group 'Trip' created with members: A, B, C"));
    assert!(output.contains("Expense 'Hotel' added to group 'Trip'."));
    assert!(output.contains("Balances for group 'Trip':"));
    assert!(output.contains("A: 60.00 EUR"));
    assert!(output.contains("B: -30.00 EUR"));
    assert!(output.contains("B owes A: 30.00 EUR"));
    assert!(output.contains("C owes A: 30.00 EUR"));
    assert!(output.contains("Recorded payment of 30.00 EUR from B to A in group 'Trip'."));
    assert!(output.contains("Help - Description of Each Function:"));
    assert!(output.trim_end().ends_with("Goodbye!"));

    assert_eq!(store.group("Trip").unwrap().entries().len(), 2);
}

/// Invalid input is reported without changing state.
#[test]
fn shell_reports_bad_input() {
    let script = "\
1\nTrip\nA, B\n\n\
1\nTrip\nC\n\n\
2\nNowhere\n\n\
2\nTrip\nZed\n\n\
2\nTrip\nA\nlots\n\n\
5\nTrip\nA\nQ\n\n\
5\nTrip\nA\nB\n-4\n\n\
4\nTrip\n\n\
9\n\n";
    let (store, output) = run_shell(script);

    assert!(output.contains("Group 'Trip' already exists."));
    assert!(output.contains("Group 'Nowhere' not found."));
    assert!(output.contains("Zed is not a member of the group 'Trip'."));
    assert!(output.contains("Invalid amount."));
    assert!(output.contains("Both payer and payee must be members of the group."));
    assert!(output.contains("Amount must be greater than zero."));
    assert!(output.contains("Everyone is settled up!"));
    assert!(output.contains("Invalid choice. Please try again."));

    assert_eq!(store.group("Trip").unwrap().members().len(), 2);
    assert!(store.group("Trip").unwrap().entries().is_empty());
}

/// Involved members can be restricted to a subset.
#[test]
fn shell_expense_with_subset() {
    let script = "\
1\nTrip\nA, B, C\n\n\
2\nTrip\nA\n50\nTaxi\nB, C\n\n\
7\n";
    let (store, _) = run_shell(script);
    let balances = store.balances("Trip").unwrap();
    assert_eq!(balances.get(&MemberId::new("A")), dec!(50));
    assert_eq!(balances.get(&MemberId::new("B")), dec!(-25));
    assert_eq!(balances.get(&MemberId::new("C")), dec!(-25));
}

/// End of input mid-prompt ends the session cleanly.
#[test]
fn shell_stops_at_end_of_input() {
    let (store, output) = run_shell("1\nTrip\n");
    assert!(store.is_empty());
    assert!(output.contains("Enter member names separated by commas: "));
}

/// Amounts beyond the per-entry maximum are refused at the prompt.
#[test]
fn shell_rejects_oversized_amount() {
    let script = "\
1\nTrip\nA, B\n\n\
2\nTrip\nA\n79228162514264337593543950335\n\n\
3\nTrip\n\n\
7\n";
    let (store, output) = run_shell(script);
    assert!(output.contains("exceeds the maximum"));
    assert!(output.contains("A: 0.00 EUR"));
    assert!(store.group("Trip").unwrap().entries().is_empty());
}
