use crate::core::balances::Balances;
use crate::core::currency::{to_display, CurrencyCode};
use crate::core::member::MemberId;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;

/// Balances within this distance of zero are treated as settled (one cent).
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// A proposed transfer from a debtor to a creditor.
///
/// `amount` keeps full precision; [`Settlement::render`] rounds it to the
/// minor unit for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub debtor: MemberId,
    pub creditor: MemberId,
    pub amount: Decimal,
}

impl Settlement {
    /// `"<debtor> owes <creditor>: <amount> <currency>"`
    pub fn render(&self, currency: &CurrencyCode) -> String {
        format!(
            "{} owes {}: {}",
            self.debtor,
            self.creditor,
            currency.format(self.amount)
        )
    }

    /// Amount rounded to the minor unit, as shown to users.
    pub fn display_amount(&self) -> String {
        to_display(self.amount)
    }
}

/// Balances handed to the planner did not net to zero.
///
/// Settlements emitted before the queues ran dry are still valid transfers;
/// this describes what could not be matched.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error(
    "balances do not net to zero (off by {imbalance}); {} member(s) left unsettled",
    .unsettled.len()
)]
pub struct BalanceInvariantViolation {
    /// Sum of the input balances.
    pub imbalance: Decimal,
    /// Members still holding a balance beyond tolerance, signed.
    pub unsettled: Vec<(MemberId, Decimal)>,
}

/// Ordered output of the settlement planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementPlan {
    settlements: Vec<Settlement>,
    violation: Option<BalanceInvariantViolation>,
}

impl SettlementPlan {
    /// Settlements in emission order.
    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn len(&self) -> usize {
        self.settlements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settlements.is_empty()
    }

    /// True when every input balance was matched.
    pub fn is_complete(&self) -> bool {
        self.violation.is_none()
    }

    pub fn violation(&self) -> Option<&BalanceInvariantViolation> {
        self.violation.as_ref()
    }

    /// Settlements if the plan is complete, otherwise the violation.
    pub fn ensure_complete(&self) -> Result<&[Settlement], BalanceInvariantViolation> {
        match &self.violation {
            None => Ok(&self.settlements),
            Some(v) => Err(v.clone()),
        }
    }

    pub fn into_settlements(self) -> Vec<Settlement> {
        self.settlements
    }
}

/// One side of the matching: a member and the magnitude still to settle.
///
/// Ordered by magnitude, then by reverse member id so that among equal
/// magnitudes the lexicographically smaller id is popped first.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Position {
    remaining: Decimal,
    member: MemberId,
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| other.member.cmp(&self.member))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Greedy largest-creditor / largest-debtor settlement planner.
///
/// # Examples
///
/// ```
/// use fairsplit::core::balances::Balances;
/// use fairsplit::core::member::MemberId;
/// use fairsplit::optimization::settlement::SettlementPlanner;
/// use rust_decimal_macros::dec;
///
/// let balances: Balances = vec![
///     (MemberId::new("A"), dec!(60)),
///     (MemberId::new("B"), dec!(-30)),
///     (MemberId::new("C"), dec!(-30)),
/// ]
/// .into_iter()
/// .collect();
///
/// let plan = SettlementPlanner::new().plan(&balances);
/// assert_eq!(plan.len(), 2);
/// assert!(plan.is_complete());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementPlanner {
    tolerance: Decimal,
}

impl Default for SettlementPlanner {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SettlementPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different settled-balance tolerance. The sign is ignored.
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Plan transfers that zero out `balances`.
    pub fn plan(&self, balances: &Balances) -> SettlementPlan {
        self.plan_positions(balances.iter())
    }

    /// Plan transfers for any sequence of signed member balances.
    ///
    /// # Algorithm
    ///
    /// 1. Members owed more than the tolerance go into a creditor max-heap,
    ///    members owing more than it into a debtor max-heap, both keyed by
    ///    magnitude. Everyone else is already settled.
    /// 2. Pop the largest creditor and the largest debtor, transfer the
    ///    smaller of the two magnitudes, and push back whichever side still
    ///    exceeds the tolerance.
    /// 3. Stop when either heap is empty.
    ///
    /// Each round retires at least one member, so at most `n - 1`
    /// settlements are emitted for `n` unsettled members, in O(n log n).
    pub fn plan_positions<'a>(
        &self,
        balances: impl IntoIterator<Item = (&'a MemberId, Decimal)>,
    ) -> SettlementPlan {
        let mut creditors = BinaryHeap::new();
        let mut debtors = BinaryHeap::new();
        let mut imbalance = Decimal::ZERO;

        for (member, balance) in balances {
            imbalance = imbalance.saturating_add(balance);
            if balance > self.tolerance {
                creditors.push(Position {
                    remaining: balance,
                    member: member.clone(),
                });
            } else if balance < -self.tolerance {
                debtors.push(Position {
                    remaining: -balance,
                    member: member.clone(),
                });
            }
        }

        let mut settlements = Vec::new();
        loop {
            let (mut creditor, mut debtor) = match (creditors.pop(), debtors.pop()) {
                (Some(c), Some(d)) => (c, d),
                (c, d) => {
                    creditors.extend(c);
                    debtors.extend(d);
                    break;
                }
            };

            let amount = creditor.remaining.min(debtor.remaining);
            debug!("{} pays {} {}", debtor.member, creditor.member, amount);
            settlements.push(Settlement {
                debtor: debtor.member.clone(),
                creditor: creditor.member.clone(),
                amount,
            });

            creditor.remaining -= amount;
            debtor.remaining -= amount;
            if creditor.remaining > self.tolerance {
                creditors.push(creditor);
            }
            if debtor.remaining > self.tolerance {
                debtors.push(debtor);
            }
        }

        let mut unsettled: Vec<(MemberId, Decimal)> = creditors
            .into_sorted_vec()
            .into_iter()
            .rev()
            .map(|p| (p.member, p.remaining))
            .collect();
        unsettled.extend(
            debtors
                .into_sorted_vec()
                .into_iter()
                .rev()
                .map(|p| (p.member, -p.remaining)),
        );

        let violation = if imbalance.abs() > self.tolerance || !unsettled.is_empty() {
            let v = BalanceInvariantViolation {
                imbalance,
                unsettled,
            };
            warn!("{}", v);
            Some(v)
        } else {
            None
        };

        SettlementPlan {
            settlements,
            violation,
        }
    }
}
