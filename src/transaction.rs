use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::Amount;

/// The unique identifier of an account
///
/// Accounts have no state of their own, their balance is derived from the
/// most recent transaction recorded under this id.
#[derive(Clone, Copy, Debug, serde::Deserialize, PartialEq, Eq, Hash)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Creates a new random account id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AccountId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The different kinds of ledger entries
#[derive(Clone, Copy, Debug, serde::Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money put into the account
    Deposit,
    /// Money taken out of the account
    Withdrawal,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => f.write_str("DEPOSIT"),
            Self::Withdrawal => f.write_str("WITHDRAWAL"),
        }
    }
}

/// One entry of an account's ledger
///
/// Transactions are never modified once they're created. The
/// `balance_after_execution` of an entry equals the balance of the previous
/// entry plus (deposit) or minus (withdrawal) its `amount`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    account_id: AccountId,
    date: NaiveDateTime,
    amount: Amount,
    balance_after_execution: Amount,
    transaction_type: TransactionType,
}

impl Transaction {
    pub fn new(
        account_id: AccountId,
        date: NaiveDateTime,
        amount: Amount,
        balance_after_execution: Amount,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            account_id,
            date,
            amount,
            balance_after_execution,
            transaction_type,
        }
    }

    /// The account this transaction belongs to
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// When the transaction was executed
    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    /// The magnitude of the transaction
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// The account balance right after this transaction
    pub fn balance_after_execution(&self) -> Amount {
        self.balance_after_execution
    }

    /// The type of the transaction
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// The signed effect on the balance, e.g. `-30.00` for a withdrawal
    pub fn impact_on_balance(&self) -> String {
        match self.transaction_type {
            TransactionType::Deposit => self.amount.to_string(),
            TransactionType::Withdrawal => format!("-{}", self.amount),
        }
    }
}
