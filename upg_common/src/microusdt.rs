use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::op;

pub const USDT_CURRENCY_CODE: &str = "USDT";
pub const USDT_CURRENCY_CODE_LOWER: &str = "usdt";

/// The number of micro-units in one USDT. Both supported stablecoin contracts carry 6 decimals.
pub const MICRO_PER_USDT: i64 = 1_000_000;

//--------------------------------------     MicroUsdt       ---------------------------------------------------------
/// An exact USDT amount in micro-units (10^-6 USDT).
///
/// Explorer APIs report token amounts as raw integer strings scaled by the token's decimal divisor. Keeping amounts
/// in integer micro-units means that matching a transfer against an order is plain integer equality, with all six
/// fractional digits preserved. No binary floating point is involved at any point.
#[derive(Debug, Clone, Copy, Default, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MicroUsdt(i64);

op!(binary MicroUsdt, Add, add);
op!(binary MicroUsdt, Sub, sub);
op!(inplace MicroUsdt, SubAssign, sub_assign);
op!(unary MicroUsdt, Neg, neg);

impl Sum for MicroUsdt {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in microUSDT: {0}")]
pub struct MicroUsdtConversionError(String);

impl From<i64> for MicroUsdt {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for MicroUsdt {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for MicroUsdt {}

impl TryFrom<u64> for MicroUsdt {
    type Error = MicroUsdtConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(MicroUsdtConversionError(format!("Value {} is too large to convert to MicroUsdt", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl FromStr for MicroUsdt {
    type Err = MicroUsdtConversionError;

    /// Parses a raw integer amount as reported by an explorer API, already scaled to micro-units.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self).map_err(|e| MicroUsdtConversionError(format!("{s}: {e}")))
    }
}

impl Display for MicroUsdt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / MICRO_PER_USDT as u64;
        let frac = magnitude % MICRO_PER_USDT as u64;
        write!(f, "{sign}{whole}.{frac:06} {USDT_CURRENCY_CODE}")
    }
}

impl MicroUsdt {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn from_usdt(usdt: i64) -> Self {
        Self(usdt * MICRO_PER_USDT)
    }

    /// Parses a raw integer amount string from an explorer response.
    pub fn from_raw_units(raw: &str) -> Result<Self, MicroUsdtConversionError> {
        raw.parse()
    }
}
