//! Shared flat: explicit shares and an imbalanced hand-made ledger.
//!
//! Shows uneven splits and how the planner reports balances that do not
//! net to zero.

use fairsplit::prelude::*;
use rust_decimal_macros::dec;

fn main() -> Result<(), LedgerError> {
    println!("╔═══════════════════════════════════════╗");
    println!("║  fairsplit: Shared Flat Example       ║");
    println!("╚═══════════════════════════════════════╝\n");

    let eur = CurrencyCode::default();
    let mut flat = Group::new("Flat", vec!["Ivy".into(), "Jon".into(), "Kim".into()])?;

    // Rent weighted by room size.
    let rent = Expense::with_splits(
        flat.id(),
        MemberId::new("Ivy"),
        dec!(1500),
        "Rent",
        vec![
            (MemberId::new("Ivy"), dec!(600)),
            (MemberId::new("Jon"), dec!(500)),
            (MemberId::new("Kim"), dec!(400)),
        ],
    )?;
    flat.add_prepared_expense(rent)?;
    flat.add_expense(&MemberId::new("Kim"), dec!(100), "Internet", None)?;

    let balances = BalanceEngine::compute_balances(&flat)?;
    println!("━━━ Balances ━━━\n");
    for (member, balance) in balances.iter() {
        println!("  {:<6} {:>12}", member, eur.format(balance));
    }

    println!("\n━━━ Settlement Plan ━━━\n");
    let plan = SettlementPlanner::new().plan(&balances);
    for settlement in plan.settlements() {
        println!("  {}", settlement.render(&eur));
    }

    // --- Balances typed in by hand that do not add up ---
    println!("\n━━━ Imbalanced Input ━━━\n");
    let typo: Balances = vec![
        (MemberId::new("Ivy"), dec!(120)),
        (MemberId::new("Jon"), dec!(-100)),
    ]
    .into_iter()
    .collect();
    let plan = SettlementPlanner::new().plan(&typo);
    for settlement in plan.settlements() {
        println!("  {}", settlement.render(&eur));
    }
    if let Some(violation) = plan.violation() {
        println!("  Warning: {}", violation);
        for (member, left) in &violation.unsettled {
            println!("    {} still at {}", member, eur.format(*left));
        }
    }

    Ok(())
}
