use std::collections::HashMap;
use std::sync::RwLock;

use crate::{AccountId, Transaction};

/// The persistence capability the ledger is built upon
///
/// Implementations are append-only: a transaction is never changed or removed
/// after it was saved. Store failures are reported as opaque errors.
pub trait TransactionsDao: Send + Sync {
    /// Appends a transaction to the account's ledger and returns the stored entry
    fn save(&self, account_id: AccountId, transaction: Transaction) -> anyhow::Result<Transaction>;

    /// The most recently appended transaction of the account, if there is any
    fn find_last(&self, account_id: AccountId) -> anyhow::Result<Option<Transaction>>;

    /// The complete ledger of the account, oldest entry first
    fn find_by_account_id(&self, account_id: AccountId) -> anyhow::Result<Vec<Transaction>>;
}

/// In-memory append-only transaction store
#[derive(Debug, Default)]
pub struct InMemoryTransactionsDao {
    ledgers: RwLock<HashMap<AccountId, Vec<Transaction>>>,
}

impl InMemoryTransactionsDao {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionsDao for InMemoryTransactionsDao {
    fn save(&self, account_id: AccountId, transaction: Transaction) -> anyhow::Result<Transaction> {
        let mut ledgers = self
            .ledgers
            .write()
            .map_err(|_| anyhow::anyhow!("transaction store lock poisoned"))?;

        ledgers
            .entry(account_id)
            .or_default()
            .push(transaction.clone());

        Ok(transaction)
    }

    fn find_last(&self, account_id: AccountId) -> anyhow::Result<Option<Transaction>> {
        let ledgers = self
            .ledgers
            .read()
            .map_err(|_| anyhow::anyhow!("transaction store lock poisoned"))?;

        Ok(ledgers
            .get(&account_id)
            .and_then(|ledger| ledger.last())
            .cloned())
    }

    fn find_by_account_id(&self, account_id: AccountId) -> anyhow::Result<Vec<Transaction>> {
        let ledgers = self
            .ledgers
            .read()
            .map_err(|_| anyhow::anyhow!("transaction store lock poisoned"))?;

        Ok(ledgers.get(&account_id).cloned().unwrap_or_default())
    }
}
