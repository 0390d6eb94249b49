use crate::core::error::LedgerError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of decimal places in the minor currency unit.
pub const MINOR_UNITS: u32 = 2;

/// Largest amount accepted for a single entry: 10^15 minor units.
///
/// Keeps per-member sums far inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal =
    Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, MINOR_UNITS);

/// ISO 4217-style currency code.
///
/// Used for display only. All amounts in a ledger are assumed to be
/// denominated in one currency; there is no conversion.
///
/// # Examples
///
/// ```
/// use fairsplit::core::currency::CurrencyCode;
///
/// let eur = CurrencyCode::default();
/// assert_eq!(eur.as_str(), "EUR");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render an amount as `"<amount> <code>"`, rounded to the minor unit.
    pub fn format(&self, amount: Decimal) -> String {
        format!("{} {}", to_display(amount), self)
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("EUR")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Round to the minor unit and pad to exactly two decimal places.
///
/// ```
/// use fairsplit::core::currency::to_display;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(to_display(dec!(30)), "30.00");
/// assert_eq!(to_display(dec!(33.335)), "33.34");
/// assert_eq!(to_display(dec!(-0.001)), "0.00");
/// ```
pub fn to_display(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(MINOR_UNITS, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(MINOR_UNITS);
    rounded.to_string()
}

/// Check that an amount is strictly positive, at most [`MAX_AMOUNT`] and
/// representable in minor units.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(format!(
            "amount must be greater than zero, got {}",
            amount
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::InvalidAmount(format!(
            "amount {} exceeds the maximum of {}",
            amount, MAX_AMOUNT
        )));
    }
    if amount.normalize().scale() > MINOR_UNITS {
        return Err(LedgerError::InvalidAmount(format!(
            "amount {} has more than {} decimal places",
            amount, MINOR_UNITS
        )));
    }
    Ok(amount)
}

/// Parse user input into a validated positive amount.
pub fn parse_amount(input: &str) -> Result<Decimal, LedgerError> {
    let trimmed = input.trim();
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| LedgerError::InvalidAmount(format!("'{}' is not a number", trimmed)))?;
    validate_amount(amount)
}
