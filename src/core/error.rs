use crate::core::member::MemberId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while validating or mutating a group ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Group '{0}' already exists.")]
    DuplicateGroup(String),
    #[error("Group '{0}' not found.")]
    GroupNotFound(String),
    #[error("{member} is not a member of the group '{group}'.")]
    UnknownMember { member: MemberId, group: String },
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Group name cannot be empty.")]
    EmptyGroupName,
    #[error("At least one member is required to create a group.")]
    NoMembers,
    #[error("{0} is listed more than once.")]
    DuplicateMember(MemberId),
    #[error("An expense must involve at least one member.")]
    NoInvolvedMembers,
    #[error("{0} cannot record a payment to themselves.")]
    SelfPayment(MemberId),
    #[error("splits sum to {actual} but the expense amount is {expected}")]
    SplitMismatch { expected: Decimal, actual: Decimal },
    #[error("balance of {0} is out of range")]
    BalanceOverflow(MemberId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from writing the group store to disk.
///
/// Read failures are not represented: an unreadable store is recovered
/// as empty state.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write group store: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode group store: {0}")]
    Json(#[from] serde_json::Error),
}
