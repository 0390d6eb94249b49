pub mod balance_engine;
pub mod settlement;
