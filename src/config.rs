use crate::core::currency::CurrencyCode;
use crate::optimization::settlement::{SettlementPlanner, DEFAULT_TOLERANCE};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_DATA_PATH: &str = "data/groups.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid tolerance '{0}': expected a non-negative decimal")]
    InvalidTolerance(String),
}

/// Runtime settings for the ledger binary.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Location of the JSON group store.
    pub data_path: PathBuf,
    /// Currency shown next to every amount.
    pub currency: CurrencyCode,
    /// Balances this close to zero count as settled.
    pub tolerance: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            currency: CurrencyCode::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Config {
    /// Read `FAIRSPLIT_DATA`, `FAIRSPLIT_CURRENCY` and `FAIRSPLIT_TOLERANCE`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let tolerance = match lookup("FAIRSPLIT_TOLERANCE") {
            Some(raw) => parse_tolerance(&raw)?,
            None => defaults.tolerance,
        };
        Ok(Self {
            data_path: lookup("FAIRSPLIT_DATA")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            currency: lookup("FAIRSPLIT_CURRENCY")
                .map(CurrencyCode::new)
                .unwrap_or(defaults.currency),
            tolerance,
        })
    }

    pub fn planner(&self) -> SettlementPlanner {
        SettlementPlanner::new().with_tolerance(self.tolerance)
    }
}

pub fn parse_tolerance(raw: &str) -> Result<Decimal, ConfigError> {
    match Decimal::from_str(raw.trim()) {
        Ok(t) if t >= Decimal::ZERO => Ok(t),
        _ => Err(ConfigError::InvalidTolerance(raw.to_string())),
    }
}
