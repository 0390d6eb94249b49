use crate::core::entry::{Expense, LedgerEntry, Payment};
use crate::core::error::LedgerError;
use crate::core::member::MemberId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// A named group of members sharing an append-only ledger.
///
/// Every entry appended through [`Group::add_expense`] or
/// [`Group::record_payment`] is checked against the member list first, so a
/// group built through this API never references an outsider.
///
/// # Examples
///
/// ```
/// use fairsplit::core::group::Group;
/// use fairsplit::core::member::MemberId;
/// use rust_decimal_macros::dec;
///
/// let mut trip = Group::new("Trip", vec!["A".into(), "B".into()]).unwrap();
/// trip.add_expense(&MemberId::new("A"), dec!(40), "Fuel", None).unwrap();
/// assert_eq!(trip.entries().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    id: Uuid,
    name: String,
    members: Vec<MemberId>,
    #[serde(default)]
    expenses: Vec<LedgerEntry>,
}

impl Group {
    /// Create an empty group.
    ///
    /// The name is trimmed and must not be empty; members must be
    /// non-empty and distinct.
    pub fn new(name: impl Into<String>, members: Vec<MemberId>) -> Result<Self, LedgerError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::EmptyGroupName);
        }
        let members: Vec<MemberId> = members.into_iter().filter(|m| !m.is_empty()).collect();
        if members.is_empty() {
            return Err(LedgerError::NoMembers);
        }
        let mut seen = HashSet::new();
        for member in &members {
            if !seen.insert(member) {
                return Err(LedgerError::DuplicateMember(member.clone()));
            }
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            members,
            expenses: Vec::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[MemberId] {
        &self.members
    }

    /// Ledger entries in the order they were recorded.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.expenses
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.members.contains(member)
    }

    /// Fail with [`LedgerError::UnknownMember`] unless `member` belongs here.
    pub fn require_member(&self, member: &MemberId) -> Result<(), LedgerError> {
        if self.contains(member) {
            Ok(())
        } else {
            Err(LedgerError::UnknownMember {
                member: member.clone(),
                group: self.name.clone(),
            })
        }
    }

    /// Append an equally split expense.
    ///
    /// `involved` defaults to every group member when `None`.
    pub fn add_expense(
        &mut self,
        paid_by: &MemberId,
        amount: Decimal,
        description: &str,
        involved: Option<Vec<MemberId>>,
    ) -> Result<&Expense, LedgerError> {
        self.require_member(paid_by)?;
        let involved = match involved {
            Some(list) => {
                for member in &list {
                    self.require_member(member)?;
                }
                list
            }
            None => self.members.clone(),
        };
        let expense =
            Expense::equal_split(self.id, paid_by.clone(), amount, description.trim(), involved)?;
        self.push_expense(expense)
    }

    /// Append an expense built elsewhere, e.g. with explicit shares.
    pub fn add_prepared_expense(&mut self, expense: Expense) -> Result<&Expense, LedgerError> {
        self.require_member(expense.paid_by())?;
        for member in expense.splits().keys() {
            self.require_member(member)?;
        }
        self.push_expense(expense)
    }

    /// Append a direct payment from `payer` to `payee`.
    pub fn record_payment(
        &mut self,
        payer: &MemberId,
        payee: &MemberId,
        amount: Decimal,
    ) -> Result<&Payment, LedgerError> {
        self.require_member(payer)?;
        self.require_member(payee)?;
        let payment = Payment::new(self.id, payer.clone(), payee.clone(), amount)?;
        self.expenses.push(LedgerEntry::Payment(payment));
        match self.expenses.last() {
            Some(LedgerEntry::Payment(p)) => Ok(p),
            _ => unreachable!("payment was just appended"),
        }
    }

    fn push_expense(&mut self, expense: Expense) -> Result<&Expense, LedgerError> {
        self.expenses.push(LedgerEntry::Expense(expense));
        match self.expenses.last() {
            Some(LedgerEntry::Expense(e)) => Ok(e),
            _ => unreachable!("expense was just appended"),
        }
    }
}
