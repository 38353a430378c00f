use clap::Parser;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use bank_ledger::{
    AccountId, Amount, ConsoleStatementPrinter, InMemoryTransactionsDao, SystemClock,
    TableTransactionFormatter, TransactionError, TransactionService, TransactionType,
};

/// Replays deposits and withdrawals from a CSV file and prints account statements
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// The path to the operations CSV file (columns: type, account, amount)
    filename: std::path::PathBuf,
    /// Only print the statement of this account
    #[clap(short, long)]
    account: Option<AccountId>,
}

/// One line of the operations file
#[derive(Debug, serde::Deserialize)]
struct Operation {
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    account: AccountId,
    // parsed from the text of the column, numbers must never pass through f64
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let mut reader = operations_reader().from_path(&args.filename)?;
    let service = TransactionService::new(
        InMemoryTransactionsDao::new(),
        SystemClock,
        TableTransactionFormatter::new(),
        ConsoleStatementPrinter::new(),
    );
    let mut accounts = Vec::new();

    for operation in reader.deserialize() {
        let operation: Operation = operation?;
        if !accounts.contains(&operation.account) {
            accounts.push(operation.account);
        }

        let result = Amount::of(operation.amount)
            .map_err(TransactionError::from)
            .and_then(|amount| match operation.transaction_type {
                TransactionType::Deposit => service.deposit(operation.account, amount),
                TransactionType::Withdrawal => service.withdrawal(operation.account, amount),
            });

        // rejected operations are skipped, the rest of the file still applies
        if let Err(err) = result {
            tracing::warn!(
                account = %operation.account,
                amount = %operation.amount,
                "skipping {}: {}",
                operation.transaction_type,
                err,
            );
        }
    }

    match args.account {
        Some(account) => service.print_statement(account)?,
        None => {
            for account in accounts {
                service.print_statement(account)?;
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn operations_reader() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(true).trim(csv::Trim::All);
    builder
}
