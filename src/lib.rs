pub use self::{
    amount::{Amount, AmountError, ParseAmountError},
    clock::{Clock, FixedClock, SystemClock},
    dao::{InMemoryTransactionsDao, TransactionsDao},
    service::{TransactionError, TransactionService},
    statement::{ConsoleStatementPrinter, StatementPrinter, TableTransactionFormatter, TransactionFormatter},
    transaction::{AccountId, Transaction, TransactionType},
};

mod amount;
mod clock;
mod dao;
mod service;
mod statement;
mod transaction;
