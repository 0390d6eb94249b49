//! # fairsplit
//!
//! Shared-expense ledger with minimal-transfer debt settlement.
//!
//! A group records expenses and direct payments between its members. The
//! ledger folds into a net balance per member, and a greedy planner turns
//! those balances into a short list of transfers that settles everyone.
//!
//! ## Architecture
//!
//! - **core**: Members, groups, ledger entries, balances, errors
//! - **optimization**: Balance engine and settlement planner
//! - **storage**: JSON-file group store
//! - **shell**: Menu-driven text interface
//! - **simulation**: Random ledgers for benchmarks and stress tests

pub mod config;
pub mod core;
pub mod optimization;
pub mod shell;
pub mod simulation;
pub mod storage;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balances::Balances;
    pub use crate::core::currency::CurrencyCode;
    pub use crate::core::entry::{Expense, LedgerEntry, Payment};
    pub use crate::core::error::LedgerError;
    pub use crate::core::group::Group;
    pub use crate::core::member::MemberId;
    pub use crate::optimization::balance_engine::BalanceEngine;
    pub use crate::optimization::settlement::{
        BalanceInvariantViolation, Settlement, SettlementPlan, SettlementPlanner,
    };
    pub use crate::storage::group_store::GroupStore;
}
