use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Error raised when a string is not a valid unsigned integer amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,
    #[error("invalid digit in amount {0:?}")]
    InvalidDigit(String),
    #[error("digit groups in {0:?} must have three digits after the first")]
    Grouping(String),
    #[error("expected an unsigned integer or a digit string, found {0}")]
    NotAnAmount(String),
}

/// Non-negative integer token amount with arbitrary precision.
///
/// Serialized as a plain decimal string so no precision is lost in JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigUint);

impl Amount {
    /// The zero amount
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Borrow the underlying big integer
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Parse a grouped-digit string such as `"1,234,567"`.
    ///
    /// Plain digit strings are accepted as well. With separators, the first
    /// group holds one to three digits and every later group exactly three.
    pub fn parse_grouped(raw: &str) -> Result<Self, AmountError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let mut groups = trimmed.split(',');
        let first = groups.next().unwrap_or_default();
        let mut digits = first.to_string();
        let mut grouped = false;
        for group in groups {
            if group.len() != 3 {
                return Err(AmountError::Grouping(raw.to_string()));
            }
            digits.push_str(group);
            grouped = true;
        }
        if grouped && !(1..=3).contains(&first.len()) {
            return Err(AmountError::Grouping(raw.to_string()));
        }

        digits.parse()
    }

    /// Read an amount from a JSON string or number, keeping every digit
    pub fn from_json(value: &JsonValue) -> Result<Self, AmountError> {
        match value {
            JsonValue::String(raw) => Self::parse_grouped(raw),
            JsonValue::Number(n) => n.to_string().parse(),
            other => Err(AmountError::NotAnAmount(other.to_string())),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::InvalidDigit(s.to_string()));
        }
        BigUint::parse_bytes(s.as_bytes(), 10)
            .map(Self)
            .ok_or_else(|| AmountError::InvalidDigit(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BigUint> for Amount {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Amount> for Amount {
    type Output = Amount;

    fn add(self, rhs: &'a Amount) -> Self::Output {
        Self(self.0 + &rhs.0)
    }
}

impl<'a> AddAssign<&'a Amount> for Amount {
    fn add_assign(&mut self, rhs: &'a Amount) {
        self.0 += &rhs.0;
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.fold(Amount::zero(), |acc, amount| acc + amount)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    /// Accepts JSON numbers of any size and grouped digit strings
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Amount::from_json(&value).map_err(de::Error::custom)
    }
}
