//! Slippage tolerance chosen by the user.

use crate::error::DomainError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

const BPS_DENOMINATOR: u32 = 10_000;

/// Tolerances above this many basis points are flagged to the user.
const HIGH_TOLERANCE_BPS: u32 = 100;

/// Maximum accepted degradation between a quoted and an executed amount, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTolerance")]
pub struct SlippageTolerance {
    bps: u32,
}

/// Unchecked wire form, validated through [`SlippageTolerance::from_bps`].
#[derive(Deserialize)]
struct RawTolerance {
    bps: u32,
}

impl TryFrom<RawTolerance> for SlippageTolerance {
    type Error = DomainError;

    fn try_from(raw: RawTolerance) -> Result<Self, Self::Error> {
        Self::from_bps(raw.bps)
    }
}

impl SlippageTolerance {
    /// 0.1%
    pub const LOW: Self = Self { bps: 10 };
    /// 0.5%
    pub const MEDIUM: Self = Self { bps: 50 };
    /// 1%
    pub const HIGH: Self = Self { bps: 100 };
    /// 3%
    pub const VERY_HIGH: Self = Self { bps: 300 };

    /// Creates a tolerance from basis points.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidTolerance`] above 10000 bps.
    pub fn from_bps(bps: u32) -> Result<Self, DomainError> {
        if bps > BPS_DENOMINATOR {
            return Err(DomainError::InvalidTolerance(bps));
        }
        Ok(Self { bps })
    }

    /// Creates a tolerance from a percentage such as `0.5`.
    ///
    /// Sub-basis-point precision is truncated.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidTolerance`] for negative values or values above 100.
    pub fn from_percent(percent: Decimal) -> Result<Self, DomainError> {
        if percent.is_sign_negative() {
            return Err(DomainError::InvalidTolerance(0));
        }
        let bps = percent
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(DomainError::InvalidTolerance(u32::MAX))?
            .trunc()
            .to_u32()
            .ok_or(DomainError::InvalidTolerance(u32::MAX))?;
        Self::from_bps(bps)
    }

    pub fn bps(&self) -> u32 {
        self.bps
    }

    /// Tolerance as a percentage (`50` bps -> `0.5`).
    pub fn as_percent(&self) -> Decimal {
        Decimal::from(self.bps) / Decimal::ONE_HUNDRED
    }

    /// Basis points of the quote the user still accepts (`10000 - bps`).
    pub fn retained_bps(&self) -> u32 {
        BPS_DENOMINATOR.saturating_sub(self.bps)
    }

    /// Whether the UI should warn about an unfavourable rate.
    pub fn is_high(&self) -> bool {
        self.bps > HIGH_TOLERANCE_BPS
    }
}

impl Default for SlippageTolerance {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl fmt::Display for SlippageTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent().normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_percent() {
        let tolerance = SlippageTolerance::from_percent(dec!(0.5)).unwrap();
        assert_eq!(tolerance, SlippageTolerance::MEDIUM);
        assert_eq!(tolerance.retained_bps(), 9950);
        assert_eq!(tolerance.to_string(), "0.5%");
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(
            SlippageTolerance::from_bps(10_001),
            Err(DomainError::InvalidTolerance(10_001))
        );
        assert!(SlippageTolerance::from_percent(dec!(-1)).is_err());
        assert!(SlippageTolerance::from_percent(dec!(100)).is_ok());
        assert_eq!(
            SlippageTolerance::from_percent(Decimal::MAX),
            Err(DomainError::InvalidTolerance(u32::MAX))
        );
    }

    #[test]
    fn test_deserialize_checks_range() {
        let tolerance: SlippageTolerance = serde_json::from_str(r#"{"bps":50}"#).unwrap();
        assert_eq!(tolerance, SlippageTolerance::MEDIUM);
        assert_eq!(
            serde_json::to_string(&SlippageTolerance::HIGH).unwrap(),
            r#"{"bps":100}"#
        );

        assert!(serde_json::from_str::<SlippageTolerance>(r#"{"bps":20000}"#).is_err());
    }

    #[test]
    fn test_high_flag() {
        assert!(!SlippageTolerance::HIGH.is_high());
        assert!(SlippageTolerance::VERY_HIGH.is_high());
        assert_eq!(SlippageTolerance::default(), SlippageTolerance::MEDIUM);
    }
}
