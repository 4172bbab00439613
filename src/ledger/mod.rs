//! Card ledger module.
//!
//! This module contains the account bookkeeping including:
//! - `Ledger` - The SQLite-backed account table and its operations
//! - `Card`, `CardNumber`, `Pin` - Issued credentials
//! - `Amount` - Validated positive currency amounts
//! - `luhn` - Check digit generation and validation
//! - `Error` types - Hard failures and card holder facing errors

mod account;
mod amount;
mod card;
mod error;
pub mod luhn;
mod store;

pub(crate) use rust_decimal::Decimal;

pub use account::{Account, AccountId};
pub use amount::Amount;
pub use card::{Card, CardNumber, Pin};
pub use error::{Error, LedgerError};
pub use store::Ledger;
