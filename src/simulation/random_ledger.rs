//! Random group generation for benchmarks and stress tests.

use crate::core::error::LedgerError;
use crate::core::group::Group;
use crate::core::member::MemberId;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random group ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Number of members in the group.
    pub member_count: usize,
    /// Number of expenses to record.
    pub expense_count: usize,
    /// Number of direct payments to record.
    pub payment_count: usize,
    /// Smallest amount, in minor units.
    pub min_cents: i64,
    /// Largest amount, in minor units.
    pub max_cents: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            member_count: 6,
            expense_count: 20,
            payment_count: 5,
            min_cents: 100,
            max_cents: 50_000,
        }
    }
}

/// Generate a group named `name` with a random ledger.
///
/// Each expense involves a random non-empty subset of members; each
/// payment goes between two distinct members. Needs at least two members
/// when payments are requested.
pub fn generate_random_group(name: &str, config: &LedgerConfig) -> Result<Group, LedgerError> {
    let mut rng = rand::thread_rng();
    let members: Vec<MemberId> = (0..config.member_count.max(1))
        .map(|i| MemberId::new(format!("MEMBER-{:03}", i)))
        .collect();
    let mut group = Group::new(name, members.clone())?;

    for i in 0..config.expense_count {
        let payer = &members[rng.gen_range(0..members.len())];
        let amount = random_amount(&mut rng, config);
        let take = rng.gen_range(1..=members.len());
        let involved: Vec<MemberId> = members
            .choose_multiple(&mut rng, take)
            .cloned()
            .collect();
        group.add_expense(payer, amount, &format!("expense {}", i), Some(involved))?;
    }

    if members.len() > 1 {
        for _ in 0..config.payment_count {
            let picked: Vec<&MemberId> = members.choose_multiple(&mut rng, 2).collect();
            let amount = random_amount(&mut rng, config);
            group.record_payment(picked[0], picked[1], amount)?;
        }
    }

    Ok(group)
}

fn random_amount(rng: &mut impl Rng, config: &LedgerConfig) -> Decimal {
    let low = config.min_cents.max(1);
    let high = config.max_cents.max(low);
    Decimal::new(rng.gen_range(low..=high), 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::balance_engine::BalanceEngine;
    use crate::optimization::settlement::SettlementPlanner;

    #[test]
    fn test_random_group_generation() {
        let config = LedgerConfig {
            member_count: 5,
            expense_count: 10,
            payment_count: 3,
            ..Default::default()
        };
        let group = generate_random_group("Random", &config).unwrap();
        assert_eq!(group.members().len(), 5);
        assert_eq!(group.entries().len(), 13);
    }

    #[test]
    fn test_random_group_settles() {
        let config = LedgerConfig {
            member_count: 25,
            expense_count: 200,
            payment_count: 40,
            ..Default::default()
        };
        let group = generate_random_group("Random", &config).unwrap();
        let balances = BalanceEngine::compute_balances(&group).unwrap();
        assert!(balances.is_balanced());

        let plan = SettlementPlanner::new().plan(&balances);
        assert!(plan.is_complete());
        assert!(plan.len() < group.members().len());
    }
}
