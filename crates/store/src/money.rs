use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Money amount represented as **integer minor units** (cents, grosze,
/// kopecks).
///
/// Ledger amounts (plot payments, expenses) use this type so that period
/// totals add up without floating-point drift.
///
/// # Examples
///
/// ```rust
/// use store::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use store::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseMoneyError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount")]
    Invalid,
    #[error("too many decimals")]
    TooManyDecimals,
    #[error("amount too large")]
    Overflow,
}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Parses a decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let rest = rest.trim();
        if rest.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or(ParseMoneyError::Invalid)?;
        let fraction = parts.next();
        if parts.next().is_some() {
            return Err(ParseMoneyError::Invalid);
        }
        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseMoneyError::Invalid);
        }
        let units: i64 = units_str.parse().map_err(|_| ParseMoneyError::Overflow)?;

        let minor: i64 = match fraction {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(ParseMoneyError::Invalid);
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| ParseMoneyError::Invalid)? * 10,
                    2 => frac.parse::<i64>().map_err(|_| ParseMoneyError::Invalid)?,
                    _ => return Err(ParseMoneyError::TooManyDecimals),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(minor))
            .ok_or(ParseMoneyError::Overflow)?;

        Ok(Money(if negative { -total } else { total }))
    }
}

/// Parses a ledger amount for a form: must be `> 0`.
pub(crate) fn parse_positive_amount(raw: &str) -> Result<Money, String> {
    let amount = raw.parse::<Money>().map_err(|err| err.to_string())?;
    if amount.minor() <= 0 {
        return Err("amount must be > 0".to_string());
    }
    Ok(amount)
}
