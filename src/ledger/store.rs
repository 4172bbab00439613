use std::path::Path;

use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};

use super::account::{Account, AccountId};
use super::amount::{from_minor_units, Amount};
use super::card::{Card, CardNumber};
use super::error::{Error, LedgerError};
use super::Decimal;

/// Draws allowed before giving up on finding an unused card number.
const MAX_ISSUE_ATTEMPTS: usize = 16;

/// The card ledger: one `card` table in a SQLite database.
///
/// The table is dropped and recreated whenever a `Ledger` is opened, so
/// accounts and ids only live as long as the process.
#[derive(Debug)]
pub struct Ledger {
    conn: Connection,
    /// Last id handed out by `create_account`
    last_id: AccountId,
}

impl Ledger {
    /// Opens (or creates) the database file at `path` and starts an empty ledger in it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        log::info!("Opening ledger at {}", path.as_ref().display());
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// An in-memory ledger, mostly for tests.
    pub fn in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, Error> {
        conn.execute_batch(
            "DROP TABLE IF EXISTS card;
             CREATE TABLE card(
                 id INTEGER,
                 number TEXT,
                 pin TEXT,
                 balance INTEGER DEFAULT 0
             );",
        )?;
        log::trace!("Ledger schema created");
        Ok(Self { conn, last_id: 0 })
    }

    /// Issues a new card with a zero balance.
    pub fn create_account<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Card, LedgerError> {
        for attempt in 1..=MAX_ISSUE_ATTEMPTS {
            let card = Card::generate(rng);
            if self.exists(card.number())? {
                log::debug!(
                    "[create] attempt {attempt}: number {} already issued, drawing again",
                    card.number()
                );
                continue;
            }

            let id = self.last_id + 1;
            self.conn.execute(
                "INSERT INTO card(id, number, pin) VALUES (?1, ?2, ?3)",
                params![id, card.number().as_str(), card.pin().as_str()],
            )?;
            self.last_id = id;

            log::info!("[create] id={id} number={}", card.number());
            return Ok(card);
        }

        log::warn!("[create] no unused card number after {MAX_ISSUE_ATTEMPTS} attempts");
        Err(LedgerError::CardIssuance)
    }

    /// Returns the number of accounts in the ledger
    pub fn account_count(&self) -> Result<u64, LedgerError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM card", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    pub fn exists(&self, number: &CardNumber) -> Result<bool, LedgerError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM card WHERE number = ?1",
                params![number.as_str()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Reads the account behind `number`.
    pub fn account(&self, number: &CardNumber) -> Result<Account, LedgerError> {
        self.conn
            .query_row(
                "SELECT id, number, balance FROM card WHERE number = ?1",
                params![number.as_str()],
                row_to_account,
            )
            .optional()?
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))
    }

    /// Checks a card number / PIN pair typed at the login prompt.
    ///
    /// Both a missing number and a wrong PIN yield the same `InvalidCredentials`.
    pub fn login(&self, number: &str, pin: &str) -> Result<Account, LedgerError> {
        let account = self
            .conn
            .query_row(
                "SELECT id, number, balance FROM card WHERE number = ?1 AND pin = ?2",
                params![number.trim(), pin.trim()],
                row_to_account,
            )
            .optional()?;

        match account {
            Some(account) => {
                log::info!("[login] id={} number={}", account.id(), account.number());
                Ok(account)
            }
            None => {
                log::warn!("[login] rejected for number {:?}", number.trim());
                Err(LedgerError::InvalidCredentials)
            }
        }
    }

    /// Returns the current balance
    pub fn balance(&self, number: &CardNumber) -> Result<Decimal, LedgerError> {
        Ok(self.account(number)?.balance())
    }

    /// Credits `amount` to the account behind `number`.
    pub fn deposit(&mut self, number: &CardNumber, amount: Amount) -> Result<(), LedgerError> {
        log::trace!("[deposit] number={number} amount={amount}");
        credit(&self.conn, number, amount)?;
        log::debug!("[deposit] number={number} amount={amount} -> ok");
        Ok(())
    }

    /// Validates a receiver card number typed by the card holder.
    ///
    /// The check digit is verified before the store is queried.
    pub fn resolve_receiver(&self, input: &str) -> Result<CardNumber, LedgerError> {
        let receiver = CardNumber::parse(input)?;
        if self.exists(&receiver)? {
            Ok(receiver)
        } else {
            Err(LedgerError::AccountNotFound(receiver.to_string()))
        }
    }

    /// Moves `amount` from `sender` to `receiver` in one SQLite transaction.
    ///
    /// The debit only applies while `balance >= amount`; if it or the credit
    /// fails, the transaction is dropped and neither balance changes.
    pub fn transfer(
        &mut self,
        sender: &CardNumber,
        receiver: &CardNumber,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        log::trace!("[transfer] sender={sender} receiver={receiver} amount={amount}");
        let cents = amount.to_minor_units();
        let tx = self.conn.transaction()?;

        let available: i64 = tx
            .query_row(
                "SELECT balance FROM card WHERE number = ?1",
                params![sender.as_str()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| LedgerError::AccountNotFound(sender.to_string()))?;

        let debited = tx.execute(
            "UPDATE card SET balance = balance - ?1 WHERE number = ?2 AND balance >= ?1",
            params![cents, sender.as_str()],
        )?;
        if debited == 0 {
            return Err(LedgerError::InsufficientFunds {
                available: from_minor_units(available),
                requested: amount.value(),
            });
        }

        credit(&tx, receiver, amount)?;

        tx.commit()?;
        log::debug!("[transfer] sender={sender} receiver={receiver} amount={amount} -> committed");
        Ok(())
    }

    /// Removes the account. No balance or confirmation requirement.
    pub fn close_account(&mut self, number: &CardNumber) -> Result<(), LedgerError> {
        let deleted = self.conn.execute(
            "DELETE FROM card WHERE number = ?1",
            params![number.as_str()],
        )?;
        if deleted == 0 {
            return Err(LedgerError::AccountNotFound(number.to_string()));
        }

        log::info!("[close] number={number}");
        Ok(())
    }
}

/// Adds `amount` to one balance, refusing to go past the `INTEGER` range of the column.
///
/// SQLite would otherwise silently turn an overflowing sum into a REAL.
fn credit(conn: &Connection, number: &CardNumber, amount: Amount) -> Result<(), LedgerError> {
    let cents = amount.to_minor_units();
    let credited = conn.execute(
        "UPDATE card SET balance = balance + ?1 WHERE number = ?2 AND balance <= ?3",
        params![cents, number.as_str(), i64::MAX - cents],
    )?;
    if credited > 0 {
        return Ok(());
    }

    let exists = conn
        .query_row(
            "SELECT 1 FROM card WHERE number = ?1",
            params![number.as_str()],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if exists {
        log::warn!("[credit] number={number} amount={amount} would overflow the balance");
        Err(LedgerError::BalanceLimit {
            number: number.to_string(),
            requested: amount.value(),
        })
    } else {
        Err(LedgerError::AccountNotFound(number.to_string()))
    }
}

fn row_to_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account::new(
        row.get(0)?,
        CardNumber::from_stored(row.get(1)?),
        from_minor_units(row.get(2)?),
    ))
}
