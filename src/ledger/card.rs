use std::fmt;

use rand::Rng;

use super::error::LedgerError;
use super::luhn;

/// Bank identification offset added to every generated card number prefix.
pub const BIN_OFFSET: u64 = 400_000_000_000_000;

/// Size of the random account range drawn on top of [`BIN_OFFSET`].
pub const ACCOUNT_RANGE: u64 = 1_000_000_000;

pub const CARD_NUMBER_LEN: usize = 16;
pub const PIN_LEN: usize = 4;

/// A 16-digit card number whose last digit is its Luhn check digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardNumber(String);

impl CardNumber {
    /// Validates a card number typed by a card holder.
    ///
    /// Only the shape and the check digit are verified, nothing is looked up.
    pub fn parse(input: &str) -> Result<Self, LedgerError> {
        let number = input.trim();
        if number.len() == CARD_NUMBER_LEN && luhn::is_valid(number) {
            Ok(CardNumber(number.to_string()))
        } else {
            Err(LedgerError::InvalidCardChecksum(number.to_string()))
        }
    }

    /// Appends the Luhn check digit to a 15-digit prefix.
    fn from_prefix(prefix: u64) -> Self {
        CardNumber(format!("{prefix:015}{}", luhn::checksum_digit_of(prefix)))
    }

    /// Wraps a number read back from the store, where it was written already validated.
    pub(super) fn from_stored(number: String) -> Self {
        CardNumber(number)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A 4-digit personal identification number.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u16> for Pin {
    fn from(value: u16) -> Self {
        Pin(format!("{:0width$}", value % 10_000, width = PIN_LEN))
    }
}

// Keep PINs out of debug output and logs
impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Credentials issued for a freshly created account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    number: CardNumber,
    pin: Pin,
}

impl Card {
    /// Draws a new card number and PIN from `rng`.
    ///
    /// Numbers are not checked against existing accounts here.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let number = CardNumber::from_prefix(BIN_OFFSET + rng.gen_range(0..ACCOUNT_RANGE));
        let pin = Pin::from(rng.gen_range(0..10_000u16));
        Self { number, pin }
    }

    pub fn number(&self) -> &CardNumber {
        &self.number
    }

    pub fn pin(&self) -> &Pin {
        &self.pin
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Your card number:\n{}\nYour card PIN:\n{}",
            self.number, self.pin
        )
    }
}
