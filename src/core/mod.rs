pub mod balances;
pub mod currency;
pub mod entry;
pub mod error;
pub mod group;
pub mod member;
