use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Units of the output token per unit of the input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
}

impl Price {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// `quote / base`, or zero when `base` is not positive.
    pub fn from_ratio(quote: Decimal, base: Decimal) -> Self {
        if base <= Decimal::ZERO {
            return Self {
                value: Decimal::ZERO,
            };
        }
        Self {
            value: quote.checked_div(base).unwrap_or(Decimal::ZERO),
        }
    }

    pub fn invert(&self) -> Self {
        if self.value.is_zero() {
            return Self {
                value: Decimal::ZERO,
            };
        }
        Self {
            value: Decimal::ONE / self.value,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_ratio_guards_zero_base() {
        assert!(Price::from_ratio(dec!(10), Decimal::ZERO).is_zero());
        assert_eq!(Price::from_ratio(dec!(10), dec!(4)).value, dec!(2.5));
    }

    #[test]
    fn test_invert() {
        assert_eq!(Price::new(dec!(4)).invert().value, dec!(0.25));
        assert!(Price::new(Decimal::ZERO).invert().is_zero());
    }
}
