use crate::core::currency::{validate_amount, MINOR_UNITS};
use crate::core::error::LedgerError;
use crate::core::member::MemberId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

/// A shared expense paid by one member on behalf of several.
///
/// The split map always sums exactly to `amount`. Expenses are immutable
/// once created; groups only ever append them.
///
/// # Examples
///
/// ```
/// use fairsplit::core::entry::Expense;
/// use fairsplit::core::member::MemberId;
/// use rust_decimal_macros::dec;
/// use uuid::Uuid;
///
/// let members = vec![MemberId::new("A"), MemberId::new("B"), MemberId::new("C")];
/// let expense = Expense::equal_split(
///     Uuid::new_v4(),
///     MemberId::new("A"),
///     dec!(100),
///     "Groceries",
///     members,
/// ).unwrap();
///
/// assert_eq!(expense.split_for(&MemberId::new("A")), dec!(33.34));
/// assert_eq!(expense.split_for(&MemberId::new("B")), dec!(33.33));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    id: Uuid,
    group_id: Uuid,
    description: String,
    amount: Decimal,
    paid_by: MemberId,
    date: DateTime<Utc>,
    involved_members: Vec<MemberId>,
    splits: BTreeMap<MemberId, Decimal>,
}

impl Expense {
    /// Create an expense split evenly between the involved members.
    ///
    /// Each member is charged the amount divided by the member count,
    /// rounded down to the minor unit. The leftover minor units go one
    /// each to the involved members in the order they were listed.
    pub fn equal_split(
        group_id: Uuid,
        paid_by: MemberId,
        amount: Decimal,
        description: impl Into<String>,
        involved_members: Vec<MemberId>,
    ) -> Result<Self, LedgerError> {
        let amount = validate_amount(amount)?;
        ensure_distinct(&involved_members)?;

        let unit = Decimal::new(1, MINOR_UNITS);
        let count = Decimal::from(involved_members.len());
        let units = amount / unit;
        let base_units = (units / count).floor();
        let leftover = units - base_units * count;

        let splits = involved_members
            .iter()
            .enumerate()
            .map(|(i, member)| {
                let extra = if Decimal::from(i) < leftover {
                    Decimal::ONE
                } else {
                    Decimal::ZERO
                };
                (member.clone(), (base_units + extra) * unit)
            })
            .collect();

        Ok(Self {
            id: Uuid::new_v4(),
            group_id,
            description: description.into(),
            amount,
            paid_by,
            date: Utc::now(),
            involved_members,
            splits,
        })
    }

    /// Create an expense with explicit per-member shares.
    ///
    /// Shares must be non-negative and sum exactly to `amount`.
    pub fn with_splits(
        group_id: Uuid,
        paid_by: MemberId,
        amount: Decimal,
        description: impl Into<String>,
        shares: Vec<(MemberId, Decimal)>,
    ) -> Result<Self, LedgerError> {
        let amount = validate_amount(amount)?;
        let involved_members: Vec<MemberId> = shares.iter().map(|(m, _)| m.clone()).collect();
        ensure_distinct(&involved_members)?;

        if let Some((member, share)) = shares.iter().find(|(_, s)| *s < Decimal::ZERO) {
            return Err(LedgerError::InvalidAmount(format!(
                "share for {} must not be negative, got {}",
                member, share
            )));
        }
        let actual: Decimal = shares.iter().map(|(_, s)| *s).sum();
        if actual != amount {
            return Err(LedgerError::SplitMismatch {
                expected: amount,
                actual,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            group_id,
            description: description.into(),
            amount,
            paid_by,
            date: Utc::now(),
            involved_members,
            splits: shares.into_iter().collect(),
        })
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn group_id(&self) -> Uuid {
        self.group_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn paid_by(&self) -> &MemberId {
        &self.paid_by
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn involved_members(&self) -> &[MemberId] {
        &self.involved_members
    }

    pub fn splits(&self) -> &BTreeMap<MemberId, Decimal> {
        &self.splits
    }

    /// Share attributed to `member`, zero if not involved.
    pub fn split_for(&self, member: &MemberId) -> Decimal {
        self.splits.get(member).copied().unwrap_or(Decimal::ZERO)
    }
}

/// A direct transfer from one member to another.
///
/// The payer is credited and the payee debited, mirroring how an expense
/// credits its payer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    id: Uuid,
    group_id: Uuid,
    amount: Decimal,
    payer: MemberId,
    payee: MemberId,
    date: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        group_id: Uuid,
        payer: MemberId,
        payee: MemberId,
        amount: Decimal,
    ) -> Result<Self, LedgerError> {
        let amount = validate_amount(amount)?;
        if payer == payee {
            return Err(LedgerError::SelfPayment(payer));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            group_id,
            amount,
            payer,
            payee,
            date: Utc::now(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn group_id(&self) -> Uuid {
        self.group_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn payer(&self) -> &MemberId {
        &self.payer
    }

    pub fn payee(&self) -> &MemberId {
        &self.payee
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// One immutable record in a group's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LedgerEntry {
    Expense(Expense),
    Payment(Payment),
}

impl LedgerEntry {
    pub fn id(&self) -> Uuid {
        match self {
            LedgerEntry::Expense(e) => e.id(),
            LedgerEntry::Payment(p) => p.id(),
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            LedgerEntry::Expense(e) => e.amount(),
            LedgerEntry::Payment(p) => p.amount(),
        }
    }

    pub fn date(&self) -> DateTime<Utc> {
        match self {
            LedgerEntry::Expense(e) => e.date(),
            LedgerEntry::Payment(p) => p.date(),
        }
    }

    /// Every member this entry references.
    pub fn participants(&self) -> Vec<&MemberId> {
        match self {
            LedgerEntry::Expense(e) => std::iter::once(e.paid_by())
                .chain(e.splits().keys())
                .collect(),
            LedgerEntry::Payment(p) => vec![p.payer(), p.payee()],
        }
    }
}

impl From<Expense> for LedgerEntry {
    fn from(expense: Expense) -> Self {
        LedgerEntry::Expense(expense)
    }
}

impl From<Payment> for LedgerEntry {
    fn from(payment: Payment) -> Self {
        LedgerEntry::Payment(payment)
    }
}

fn ensure_distinct(members: &[MemberId]) -> Result<(), LedgerError> {
    if members.is_empty() {
        return Err(LedgerError::NoInvolvedMembers);
    }
    let mut seen = HashSet::new();
    for member in members {
        if !seen.insert(member) {
            return Err(LedgerError::DuplicateMember(member.clone()));
        }
    }
    Ok(())
}
