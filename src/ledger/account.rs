use super::card::CardNumber;
use super::Decimal;

/// Process-local sequential account id.
pub type AccountId = i64;

/// Snapshot of one row of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    number: CardNumber,
    balance: Decimal,
}

impl Account {
    pub(super) fn new(id: AccountId, number: CardNumber, balance: Decimal) -> Self {
        Self {
            id,
            number,
            balance,
        }
    }

    /// Returns the account id assigned at creation
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Returns the card number
    pub fn number(&self) -> &CardNumber {
        &self.number
    }

    /// Returns the balance at the time the snapshot was read
    pub fn balance(&self) -> Decimal {
        self.balance
    }
}
