use crate::error::DomainError;
use primitive_types::U256;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest mantissa a `Decimal` can hold (2^96 - 1).
const MAX_DECIMAL_MANTISSA: u128 = 79_228_162_514_264_337_593_543_950_335;

/// Highest scale a `Decimal` supports.
const MAX_DECIMAL_SCALE: u32 = 28;

/// A ledger quantity: the raw integer and the number of decimals it is scaled by.
///
/// Arithmetic is always done on `raw`; [`Amount::to_decimal`] is the display boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount {
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Wraps a raw `u64` token amount, the width SPL accounts use.
    pub fn from_raw(raw: u64, decimals: u8) -> Self {
        Self {
            raw: U256::from(raw),
            decimals,
        }
    }

    pub fn zero(decimals: u8) -> Self {
        Self::from_raw(0, decimals)
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    /// Converts a human amount to raw units, flooring anything below one raw unit.
    ///
    /// # Errors
    /// Returns [`DomainError::AmountOutOfRange`] for negative values or values that do
    /// not fit a `u64` once scaled.
    pub fn from_decimal(d: Decimal, decimals: u8) -> Result<Self, DomainError> {
        let out_of_range = || DomainError::AmountOutOfRange {
            amount: d.to_string(),
            decimals,
        };

        if d.is_sign_negative() {
            return Err(out_of_range());
        }

        let multiplier = 10u64
            .checked_pow(u32::from(decimals))
            .map(Decimal::from)
            .ok_or_else(out_of_range)?;
        let raw = d
            .checked_mul(multiplier)
            .ok_or_else(out_of_range)?
            .floor()
            .to_u64()
            .ok_or_else(out_of_range)?;

        Ok(Self::from_raw(raw, decimals))
    }

    /// Human-scaled value: `raw / 10^decimals`.
    pub fn to_decimal(&self) -> Decimal {
        let raw = self.raw.min(U256::from(MAX_DECIMAL_MANTISSA)).as_u128() as i128;
        let scale = u32::from(self.decimals);

        if scale <= MAX_DECIMAL_SCALE {
            return Decimal::try_from_i128_with_scale(raw, scale).unwrap_or(Decimal::ZERO);
        }

        // Drop the digits Decimal cannot represent.
        let excess = scale - MAX_DECIMAL_SCALE;
        match 10u128.checked_pow(excess) {
            Some(divisor) => {
                Decimal::try_from_i128_with_scale(raw / divisor as i128, MAX_DECIMAL_SCALE)
                    .unwrap_or(Decimal::ZERO)
            }
            None => Decimal::ZERO,
        }
    }

    /// Raw value as `u64`, saturating.
    pub fn as_u64(&self) -> u64 {
        if self.raw > U256::from(u64::MAX) {
            u64::MAX
        } else {
            self.raw.low_u64()
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal().normalize())
    }
}
