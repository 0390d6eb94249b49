use crate::core::error::LedgerError;
use crate::core::member::MemberId;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Net position of each member of a group.
///
/// A positive balance means the member is owed money (net creditor).
/// A negative balance means the member owes money (net debtor).
///
/// Balances are derived from a group's ledger on demand and never stored.
/// Iteration follows the order in which members were first seen, which for
/// computed balances is the group's member order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Balances {
    order: Vec<MemberId>,
    positions: HashMap<MemberId, Decimal>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every listed member at zero.
    pub fn zeroed<'a>(members: impl IntoIterator<Item = &'a MemberId>) -> Self {
        let mut balances = Self::new();
        for member in members {
            balances.open(member.clone());
        }
        balances
    }

    fn open(&mut self, member: MemberId) -> &mut Decimal {
        if !self.positions.contains_key(&member) {
            self.order.push(member.clone());
        }
        self.positions.entry(member).or_insert(Decimal::ZERO)
    }

    /// Increase what `member` is owed.
    pub fn credit(&mut self, member: &MemberId, amount: Decimal) -> Result<(), LedgerError> {
        let position = self.open(member.clone());
        *position = position
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow(member.clone()))?;
        Ok(())
    }

    /// Increase what `member` owes.
    pub fn debit(&mut self, member: &MemberId, amount: Decimal) -> Result<(), LedgerError> {
        let position = self.open(member.clone());
        *position = position
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow(member.clone()))?;
        Ok(())
    }

    /// Balance of `member`, zero if unknown.
    pub fn get(&self, member: &MemberId) -> Decimal {
        self.positions.get(member).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.positions.contains_key(member)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, Decimal)> + '_ {
        self.order.iter().map(move |m| (m, self.get(m)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of all balances. Zero for any consistent ledger.
    ///
    /// Saturates at the bounds of `Decimal`.
    pub fn total(&self) -> Decimal {
        self.positions
            .values()
            .fold(Decimal::ZERO, |acc, b| acc.saturating_add(*b))
    }

    pub fn is_balanced(&self) -> bool {
        self.total() == Decimal::ZERO
    }

    /// Members owed more than `tolerance`.
    pub fn creditors(&self, tolerance: Decimal) -> Vec<(&MemberId, Decimal)> {
        self.iter().filter(|(_, b)| *b > tolerance).collect()
    }

    /// Members owing more than `tolerance`.
    pub fn debtors(&self, tolerance: Decimal) -> Vec<(&MemberId, Decimal)> {
        self.iter().filter(|(_, b)| *b < -tolerance).collect()
    }
}

/// Repeated members accumulate, saturating at the bounds of `Decimal`.
impl FromIterator<(MemberId, Decimal)> for Balances {
    fn from_iter<T: IntoIterator<Item = (MemberId, Decimal)>>(iter: T) -> Self {
        let mut balances = Self::new();
        for (member, amount) in iter {
            let position = balances.open(member);
            *position = position.saturating_add(amount);
        }
        balances
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_and_debit() {
        let mut b = Balances::new();
        b.credit(&MemberId::new("A"), dec!(60)).unwrap();
        b.debit(&MemberId::new("B"), dec!(30)).unwrap();
        b.debit(&MemberId::new("C"), dec!(30)).unwrap();

        assert_eq!(b.get(&MemberId::new("A")), dec!(60));
        assert_eq!(b.get(&MemberId::new("B")), dec!(-30));
        assert_eq!(b.get(&MemberId::new("Z")), Decimal::ZERO);
        assert!(b.is_balanced());
    }

    #[test]
    fn test_iteration_keeps_first_seen_order() {
        let members = [MemberId::new("C"), MemberId::new("A"), MemberId::new("B")];
        let mut b = Balances::zeroed(&members);
        b.credit(&MemberId::new("A"), dec!(5)).unwrap();
        let order: Vec<&str> = b.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_creditors_and_debtors_respect_tolerance() {
        let b: Balances = vec![
            (MemberId::new("A"), dec!(10)),
            (MemberId::new("B"), dec!(0.01)),
            (MemberId::new("C"), dec!(-10.01)),
        ]
        .into_iter()
        .collect();
        assert_eq!(b.creditors(dec!(0.01)).len(), 1);
        assert_eq!(b.debtors(dec!(0.01)).len(), 1);
        assert!(b.is_balanced());
    }

    #[test]
    fn test_unbalanced_detected() {
        let b: Balances = vec![(MemberId::new("A"), dec!(10))].into_iter().collect();
        assert!(!b.is_balanced());
        assert_eq!(b.total(), dec!(10));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let a = MemberId::new("A");
        let mut b = Balances::new();
        b.credit(&a, Decimal::MAX).unwrap();
        assert!(matches!(
            b.credit(&a, Decimal::ONE),
            Err(LedgerError::BalanceOverflow(m)) if m == a
        ));
        assert_eq!(b.get(&a), Decimal::MAX);

        b.debit(&a, Decimal::MAX).unwrap();
        b.debit(&a, Decimal::MAX).unwrap();
        assert!(b.debit(&a, Decimal::ONE).is_err());
        assert_eq!(b.get(&a), Decimal::MIN);
    }

    #[test]
    fn test_total_saturates() {
        let b: Balances = vec![
            (MemberId::new("A"), Decimal::MAX),
            (MemberId::new("B"), Decimal::MAX),
        ]
        .into_iter()
        .collect();
        assert_eq!(b.total(), Decimal::MAX);
        assert!(!b.is_balanced());
    }
}
