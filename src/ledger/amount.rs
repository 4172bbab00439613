use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;

use super::error::LedgerError;
use super::Decimal;

/// Number of fractional digits a currency amount may carry.
pub const SCALE: u32 = 2;

/// A validated, strictly positive currency amount with at most two decimals.
///
/// Deposits and transfers only accept an `Amount`, so a non-positive value can
/// never reach the store. The minor-unit value is fixed when the amount is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount {
    value: Decimal,
    cents: i64,
}

impl Amount {
    pub fn value(self) -> Decimal {
        self.value
    }

    /// The amount in minor units (cents), as persisted in the `balance` column.
    pub(crate) fn to_minor_units(self) -> i64 {
        self.cents
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        let value = value.normalize();
        match to_minor_units(value) {
            Some(cents) if value > Decimal::ZERO && value.scale() <= SCALE => {
                Ok(Amount { value, cents })
            }
            _ => Err(LedgerError::InvalidAmount(value.to_string())),
        }
    }
}

impl FromStr for Amount {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = Decimal::from_str(trimmed)
            .map_err(|_| LedgerError::InvalidAmount(trimmed.to_string()))?;
        Amount::try_from(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

fn to_minor_units(value: Decimal) -> Option<i64> {
    value
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.trunc().to_i64())
}

/// Converts a persisted minor-unit balance back to a currency value.
pub(crate) fn from_minor_units(cents: i64) -> Decimal {
    Decimal::new(cents, SCALE).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_amount() {
        let amount = Amount::try_from(dec!(100.5)).unwrap();
        assert_eq!(amount.value(), dec!(100.5));
        assert_eq!(amount.to_minor_units(), 10_050);
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        let amount = Amount::try_from(dec!(12.3400)).unwrap();
        assert_eq!(amount.value(), dec!(12.34));
    }

    #[test]
    fn test_rejects_more_than_2_decimals() {
        assert!(Amount::try_from(dec!(1.234)).is_err());
    }

    #[test]
    fn test_rejects_negative_amount() {
        assert!(Amount::try_from(dec!(-100)).is_err());
    }

    #[test]
    fn test_rejects_zero_amount() {
        assert!(Amount::try_from(Decimal::ZERO).is_err());
    }

    #[test]
    fn test_parses_user_input() {
        assert_eq!(" 30 \n".parse::<Amount>().unwrap().value(), dec!(30));
        assert_eq!("0.01".parse::<Amount>().unwrap().to_minor_units(), 1);
    }

    #[test]
    fn test_rejects_garbage_input() {
        assert!(matches!(
            "ten".parse::<Amount>(),
            Err(LedgerError::InvalidAmount(s)) if s == "ten"
        ));
        assert!("".parse::<Amount>().is_err());
        assert!("-5".parse::<Amount>().is_err());
    }

    #[test]
    fn test_rejects_amount_beyond_minor_unit_range() {
        assert!("100000000000000000".parse::<Amount>().is_err());
        let largest = Amount::try_from(Decimal::new(i64::MAX, SCALE)).unwrap();
        assert_eq!(largest.to_minor_units(), i64::MAX);
    }

    #[test]
    fn test_minor_units_round_trip() {
        assert_eq!(from_minor_units(7_000), dec!(70));
        assert_eq!(from_minor_units(1_234), dec!(12.34));
        assert_eq!(from_minor_units(0), Decimal::ZERO);
    }
}
