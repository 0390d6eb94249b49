//! Weekend trip: expenses, balances, a payment, and the settlement plan.
//!
//! Demonstrates the full flow from recording expenses to the transfers
//! that settle everyone.

use fairsplit::prelude::*;
use rust_decimal_macros::dec;

fn print_balances(store: &GroupStore, eur: &CurrencyCode) -> Result<(), LedgerError> {
    for (member, balance) in store.balances("Trip")?.iter() {
        let status = if balance > dec!(0) {
            "IS OWED"
        } else if balance < dec!(0) {
            "OWES"
        } else {
            "SETTLED"
        };
        println!("  {:<8} {:>12}  [{}]", member, eur.format(balance), status);
    }
    Ok(())
}

fn print_plan(store: &GroupStore, eur: &CurrencyCode) -> Result<(), LedgerError> {
    let plan = store.settle("Trip", &SettlementPlanner::new())?;
    if plan.is_empty() {
        println!("  Everyone is settled up!");
    }
    for settlement in plan.settlements() {
        println!("  {}", settlement.render(eur));
    }
    Ok(())
}

fn main() -> Result<(), LedgerError> {
    println!("╔═══════════════════════════════════════╗");
    println!("║  fairsplit: Weekend Trip Example      ║");
    println!("╚═══════════════════════════════════════╝\n");

    let eur = CurrencyCode::new("EUR");
    let mut store = GroupStore::in_memory();
    let (ana, ben, cleo, dev) = (
        MemberId::new("Ana"),
        MemberId::new("Ben"),
        MemberId::new("Cleo"),
        MemberId::new("Dev"),
    );
    store.create_group(
        "Trip",
        vec![ana.clone(), ben.clone(), cleo.clone(), dev.clone()],
    )?;

    // --- Expenses ---
    println!("━━━ Expenses ━━━\n");
    store.add_expense("Trip", &ana, dec!(240), "Cabin", None)?;
    store.add_expense("Trip", &ben, dec!(86.40), "Groceries", None)?;
    store.add_expense(
        "Trip",
        &cleo,
        dec!(45),
        "Canoe rental",
        Some(vec![cleo.clone(), dev.clone()]),
    )?;
    for entry in store.group("Trip")?.entries() {
        if let LedgerEntry::Expense(e) = entry {
            println!("  {:<14} {:>12}  paid by {}", e.description(), eur.format(e.amount()), e.paid_by());
        }
    }

    println!("\n━━━ Balances ━━━\n");
    print_balances(&store, &eur)?;

    println!("\n━━━ Settlement Plan ━━━\n");
    print_plan(&store, &eur)?;

    // --- Dev pays Ana back directly ---
    println!("\n━━━ After Dev pays Ana 50.00 EUR ━━━\n");
    store.record_payment("Trip", &dev, &ana, dec!(50))?;
    print_balances(&store, &eur)?;
    println!();
    print_plan(&store, &eur)?;

    Ok(())
}
