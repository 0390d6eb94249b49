use crate::core::balances::Balances;
use crate::core::entry::{Expense, LedgerEntry};
use crate::core::error::LedgerError;
use crate::core::group::Group;
use crate::core::member::MemberId;
use rust_decimal::Decimal;

/// Folds a group's ledger into per-member net balances.
pub struct BalanceEngine;

impl BalanceEngine {
    /// Compute the net balance of every member of `group`.
    ///
    /// # Algorithm
    ///
    /// 1. Every member starts at zero.
    /// 2. Expense: the payer is credited `amount - own share` (the full
    ///    amount if not involved); every other involved member is debited
    ///    their share.
    /// 3. Payment: the payer is credited, the payee debited.
    ///
    /// The result always sums to zero. A hand-edited store can break that,
    /// so entries are checked as they are folded:
    ///
    /// - someone outside the member list fails with
    ///   [`LedgerError::UnknownMember`];
    /// - splits that do not add up to the amount fail with
    ///   [`LedgerError::SplitMismatch`];
    /// - a balance leaving the range of `Decimal` fails with
    ///   [`LedgerError::BalanceOverflow`].
    pub fn compute_balances(group: &Group) -> Result<Balances, LedgerError> {
        let mut balances = Balances::zeroed(group.members());

        for entry in group.entries() {
            for member in entry.participants() {
                Self::check_member(group, &balances, member)?;
            }
            match entry {
                LedgerEntry::Expense(expense) => {
                    Self::check_splits(expense)?;
                    let payer = expense.paid_by();
                    let own_share = expense.split_for(payer);
                    let lent = expense
                        .amount()
                        .checked_sub(own_share)
                        .ok_or_else(|| LedgerError::BalanceOverflow(payer.clone()))?;
                    balances.credit(payer, lent)?;
                    for (member, share) in expense.splits() {
                        if member != payer {
                            balances.debit(member, *share)?;
                        }
                    }
                }
                LedgerEntry::Payment(payment) => {
                    balances.credit(payment.payer(), payment.amount())?;
                    balances.debit(payment.payee(), payment.amount())?;
                }
            }
        }

        Ok(balances)
    }

    fn check_splits(expense: &Expense) -> Result<(), LedgerError> {
        let expected = expense.amount();
        let actual = expense
            .splits()
            .values()
            .try_fold(Decimal::ZERO, |acc, share| acc.checked_add(*share));
        match actual {
            Some(actual) if actual == expected => Ok(()),
            Some(actual) => Err(LedgerError::SplitMismatch { expected, actual }),
            None => Err(LedgerError::BalanceOverflow(expense.paid_by().clone())),
        }
    }

    fn check_member(
        group: &Group,
        balances: &Balances,
        member: &MemberId,
    ) -> Result<(), LedgerError> {
        if balances.contains(member) {
            Ok(())
        } else {
            Err(LedgerError::UnknownMember {
                member: member.clone(),
                group: group.name().to_string(),
            })
        }
    }
}
