use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    AccountId, Amount, AmountError, Clock, StatementPrinter, Transaction, TransactionFormatter,
    TransactionType, TransactionsDao,
};

/// Possible errors to occur while operating on a ledger
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error("The withdrawal cannot be greater than the balance.")]
    InsufficientFunds,
    #[error("The transaction store failed: {0}")]
    Store(#[from] anyhow::Error),
    #[error("The statement could not be printed: {0}")]
    Output(#[from] std::io::Error),
}

/// The central ledger service
///
/// Every deposit and withdrawal reads the latest balance of the account and
/// appends a new entry based on it. Both steps happen while holding a lock
/// that is unique to the account, so concurrent mutations of the same account
/// cannot build on a stale balance. Other accounts are not affected by that
/// lock.
pub struct TransactionService<D, C, F, P> {
    dao: D,
    clock: C,
    formatter: F,
    printer: P,
    /// The locks of all accounts with a mutation in flight
    account_locks: Mutex<HashMap<AccountId, Arc<Mutex<()>>>>,
}

impl<D, C, F, P> TransactionService<D, C, F, P>
where
    D: TransactionsDao,
    C: Clock,
    F: TransactionFormatter,
    P: StatementPrinter,
{
    pub fn new(dao: D, clock: C, formatter: F, printer: P) -> Self {
        Self {
            dao,
            clock,
            formatter,
            printer,
            account_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying transaction store
    pub fn dao(&self) -> &D {
        &self.dao
    }

    /// Puts the amount into the account and returns the recorded transaction
    pub fn deposit(&self, account_id: AccountId, amount: Amount) -> Result<Transaction, TransactionError> {
        self.serialized(account_id, || {
            let date = self.clock.now();
            let balance = self.current_balance(account_id)?;
            let deposit = Transaction::new(
                account_id,
                date,
                amount,
                balance.plus(amount)?,
                TransactionType::Deposit,
            );

            self.record(deposit)
        })
    }

    /// Takes the amount out of the account and returns the recorded transaction
    ///
    /// Fails with [`TransactionError::InsufficientFunds`] without recording
    /// anything if the amount exceeds the current balance.
    pub fn withdrawal(&self, account_id: AccountId, amount: Amount) -> Result<Transaction, TransactionError> {
        self.serialized(account_id, || {
            let date = self.clock.now();
            let balance = self.current_balance(account_id)?;
            if amount > balance {
                tracing::debug!(account = %account_id, %amount, %balance, "withdrawal refused");
                return Err(TransactionError::InsufficientFunds);
            }

            let withdrawal = Transaction::new(
                account_id,
                date,
                amount,
                balance.minus(amount)?,
                TransactionType::Withdrawal,
            );

            self.record(withdrawal)
        })
    }

    /// Formats the account's ledger and hands it to the printer
    pub fn print_statement(&self, account_id: AccountId) -> Result<(), TransactionError> {
        let transactions = self.dao.find_by_account_id(account_id)?;
        let lines = self.formatter.format(&transactions);
        self.printer.print(&lines)?;

        Ok(())
    }

    /// The balance after the most recent transaction, or zero for a new account
    pub fn current_balance(&self, account_id: AccountId) -> Result<Amount, TransactionError> {
        let balance = self
            .dao
            .find_last(account_id)?
            .map(|transaction| transaction.balance_after_execution())
            .unwrap_or_else(Amount::zero);
        tracing::debug!(account = %account_id, %balance, "looked up balance");

        Ok(balance)
    }

    fn record(&self, transaction: Transaction) -> Result<Transaction, TransactionError> {
        let account_id = transaction.account_id();
        let saved = self.dao.save(account_id, transaction)?;
        tracing::info!(
            account = %account_id,
            kind = %saved.transaction_type(),
            amount = %saved.amount(),
            balance = %saved.balance_after_execution(),
            "transaction recorded",
        );

        Ok(saved)
    }

    /// Runs `operation` while holding the account's lock
    fn serialized<T>(&self, account_id: AccountId, operation: impl FnOnce() -> T) -> T {
        let lock = self.account_lock(account_id);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            operation()
        };
        self.release_account_lock(account_id, lock);

        result
    }

    fn account_lock(&self, account_id: AccountId) -> Arc<Mutex<()>> {
        // the registry lock is only held to look up the account's own lock
        let mut locks = self.account_locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(account_id).or_default())
    }

    fn release_account_lock(&self, account_id: AccountId, lock: Arc<Mutex<()>>) {
        let mut locks = self.account_locks.lock().unwrap_or_else(PoisonError::into_inner);
        // clones are only handed out under the registry lock, so nobody else
        // can be waiting on this account when the registry and `lock` are the
        // last two owners
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&account_id);
        }
    }
}
