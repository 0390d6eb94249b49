use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fairsplit::optimization::balance_engine::BalanceEngine;
use fairsplit::optimization::settlement::SettlementPlanner;
use fairsplit::simulation::random_ledger::{generate_random_group, LedgerConfig};

fn bench_balances_1000_entries(c: &mut Criterion) {
    let config = LedgerConfig {
        member_count: 20,
        expense_count: 900,
        payment_count: 100,
        ..Default::default()
    };
    let Ok(group) = generate_random_group("bench", &config) else {
        return;
    };

    c.bench_function("balances_1000_entries", |b| {
        b.iter(|| BalanceEngine::compute_balances(black_box(&group)))
    });
}

fn bench_plan(c: &mut Criterion, name: &str, member_count: usize) {
    let config = LedgerConfig {
        member_count,
        expense_count: member_count * 5,
        payment_count: member_count,
        ..Default::default()
    };
    let Ok(group) = generate_random_group("bench", &config) else {
        return;
    };
    let Ok(balances) = BalanceEngine::compute_balances(&group) else {
        return;
    };
    let planner = SettlementPlanner::new();

    c.bench_function(name, |b| b.iter(|| planner.plan(black_box(&balances))));
}

fn bench_plan_10_members(c: &mut Criterion) {
    bench_plan(c, "plan_10_members", 10);
}

fn bench_plan_100_members(c: &mut Criterion) {
    bench_plan(c, "plan_100_members", 100);
}

fn bench_plan_1000_members(c: &mut Criterion) {
    bench_plan(c, "plan_1000_members", 1000);
}

criterion_group!(
    benches,
    bench_balances_1000_entries,
    bench_plan_10_members,
    bench_plan_100_members,
    bench_plan_1000_members
);
criterion_main!(benches);
