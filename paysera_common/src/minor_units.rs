use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::op;

pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

//--------------------------------------     MinorUnits       ---------------------------------------------------------
/// A currency amount expressed as a whole number of the smallest currency unit (e.g. cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(i64);

op!(binary MinorUnits, Add, add);
op!(binary MinorUnits, Sub, sub);
op!(inplace MinorUnits, AddAssign, add_assign);
op!(inplace MinorUnits, SubAssign, sub_assign);
op!(unary MinorUnits, Neg, neg);

impl Sum for MinorUnits {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Value cannot be represented in minor units: {0}")]
pub struct MinorUnitsConversionError(String);

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Parses an integer amount that is *already* in minor units, e.g. the provider's `payamount` field.
impl FromStr for MinorUnits {
    type Err = MinorUnitsConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(MinorUnitsConversionError(format!("'{s}' is not a whole number of minor units")));
        }
        s.parse::<i64>().map(Self).map_err(|e| MinorUnitsConversionError(format!("'{s}' is out of range. {e}")))
    }
}

impl Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_major = MINOR_UNITS_PER_MAJOR.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / per_major, abs % per_major)
    }
}

impl MinorUnits {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_major(major: i64) -> Self {
        Self(major * MINOR_UNITS_PER_MAJOR)
    }

    /// Converts a decimal amount in major units (`"94.00"`, `"94.5"`, `"12"`) into minor units.
    ///
    /// At most two fractional digits are accepted. Anything finer than a cent cannot be charged, so it is an error
    /// rather than being silently rounded.
    pub fn from_major_str(amount: &str) -> Result<Self, MinorUnitsConversionError> {
        let amount = amount.trim();
        let (negative, unsigned) = match amount.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, amount),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) || fraction.len() > 2 {
            return Err(MinorUnitsConversionError(format!("Invalid decimal amount: '{amount}'")));
        }
        let overflow = || MinorUnitsConversionError(format!("Amount is too large: '{amount}'"));
        let whole = whole.parse::<i64>().map_err(|_| overflow())?;
        let cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| overflow())? * 10,
            _ => fraction.parse::<i64>().map_err(|_| overflow())?,
        };
        let value =
            whole.checked_mul(MINOR_UNITS_PER_MAJOR).and_then(|v| v.checked_add(cents)).ok_or_else(overflow)?;
        Ok(Self(if negative { -value } else { value }))
    }
}
