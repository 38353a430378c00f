use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::Transaction;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_WIDTH: usize = 23;
const TYPE_WIDTH: usize = 20;
const IMPACT_WIDTH: usize = 29;
const BALANCE_HEADER_WIDTH: usize = 33;
const BANNER_HYPHENS: usize = (DATE_WIDTH + TYPE_WIDTH + IMPACT_WIDTH) / 2;
const NO_DATA: &str = "|No data found";

/// Turns an account's ledger into display lines
pub trait TransactionFormatter: Send + Sync {
    fn format(&self, transactions: &[Transaction]) -> Vec<String>;
}

/// Emits display lines to some output
pub trait StatementPrinter: Send + Sync {
    fn print(&self, lines: &[String]) -> io::Result<()>;
}

/// Formats a ledger as a fixed-width table, headed by two banners
///
/// The balance banner shows the balance after the *first* supplied
/// transaction, or `0.00` for an empty ledger.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableTransactionFormatter;

impl TableTransactionFormatter {
    pub fn new() -> Self {
        Self
    }

    fn header(transactions: &[Transaction]) -> Vec<String> {
        let balance = transactions
            .first()
            .map(|transaction| transaction.balance_after_execution().to_string())
            .unwrap_or_else(|| String::from("0.00"));
        let hyphens = "-".repeat(BANNER_HYPHENS);

        vec![
            format!("|{hyphens} WELCOME TO YOUR BANK ACCOUNT HISTORY {hyphens}|"),
            format!("|{hyphens} CURRENT BALANCE OF USER : {balance}€ {hyphens}|"),
            String::new(),
            format!(
                "{:<DATE_WIDTH$}{:<TYPE_WIDTH$}{:<IMPACT_WIDTH$}{:<BALANCE_HEADER_WIDTH$}",
                "|Transaction date",
                "|Transaction type",
                "|Impact on the balance",
                "|Balance after the transaction",
            ),
        ]
    }

    fn row(transaction: &Transaction) -> String {
        // the balance column of the rows is narrower than its header
        format!(
            "{:<DATE_WIDTH$}{:<TYPE_WIDTH$}{:<IMPACT_WIDTH$}{:<IMPACT_WIDTH$}",
            format!("|{}", transaction.date().format(DATE_FORMAT)),
            format!("|{}", transaction.transaction_type()),
            format!("|{}€", transaction.impact_on_balance()),
            format!("|{}€", transaction.balance_after_execution()),
        )
    }
}

impl TransactionFormatter for TableTransactionFormatter {
    fn format(&self, transactions: &[Transaction]) -> Vec<String> {
        let mut lines = Self::header(transactions);

        if transactions.is_empty() {
            lines.push(format!(
                "{NO_DATA:<DATE_WIDTH$}{NO_DATA:<TYPE_WIDTH$}{NO_DATA:<IMPACT_WIDTH$}{NO_DATA:<IMPACT_WIDTH$}"
            ));
        } else {
            lines.extend(transactions.iter().map(Self::row));
        }

        lines
    }
}

/// Writes each line on its own line to a writer, stdout by default
#[derive(Debug)]
pub struct ConsoleStatementPrinter<W = io::Stdout> {
    out: Mutex<W>,
}

impl ConsoleStatementPrinter {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleStatementPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleStatementPrinter<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Gives back the underlying writer
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> StatementPrinter for ConsoleStatementPrinter<W> {
    fn print(&self, lines: &[String]) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        for line in lines {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}
