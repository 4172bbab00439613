use crate::ledger::Decimal;

/// Top-level error type for the ledger.
///
/// These are hard errors: they end the run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Soft (card holder) errors raised by ledger operations.
/// The operation is aborted with no mutation, the message is shown and the session continues.
///
/// The `Display` text is the message shown to the card holder.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Not enough money!")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Invalid amount {0:?}! Please enter a positive number!")]
    InvalidAmount(String),

    #[error("You probably made a mistake in the card number. Please try again!")]
    InvalidCardChecksum(String),

    #[error("Such a card does not exist.")]
    AccountNotFound(String),

    /// Login failure. Deliberately says nothing about which field was wrong.
    #[error("Wrong card number or PIN!")]
    InvalidCredentials,

    #[error("Could not issue a unique card number, please try again.")]
    CardIssuance,

    #[error("The balance cannot hold that much money!")]
    BalanceLimit { number: String, requested: Decimal },

    #[error("Error occurred while writing to DB: {0}")]
    Storage(#[from] rusqlite::Error),
}
