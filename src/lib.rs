//! # Card Ledger
//!
//! A minimal banking ledger: card issuing with Luhn-checked numbers, login,
//! balance inquiry, deposits and transfers between cards, stored in SQLite.
//!
//! ## Example
//!
//! ```no_run
//! use card_ledger::{Amount, Ledger};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut ledger = Ledger::in_memory().unwrap();
//! let mut rng = StdRng::seed_from_u64(1);
//! let card = ledger.create_account(&mut rng).unwrap();
//! ledger.deposit(card.number(), "100".parse::<Amount>().unwrap()).unwrap();
//! println!("{card}");
//! ```

mod atm;
mod ledger;

pub use atm::Atm;
pub use ledger::luhn;
pub use ledger::{Account, AccountId, Amount, Card, CardNumber, Error, Ledger, LedgerError, Pin};
pub use rust_decimal::Decimal;
