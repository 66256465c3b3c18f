use crate::cli;
use crate::config::Config;
use crate::error::Result;
use crate::models::{Transaction, TransactionKind};
use crate::persistence::Backend;
use clap::Subcommand;
use rust_decimal::Decimal;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum ShowResource {
    /// List every transaction, oldest first
    Transactions,
    /// Totals per type and net position, converted to USD at fixed rates
    Summary,
    /// Show configuration and data paths
    Paths,
}

impl ShowResource {
    pub async fn execute(&self) -> Result<()> {
        match self {
            ShowResource::Transactions => show_transactions().await,
            ShowResource::Summary => show_summary().await,
            ShowResource::Paths => show_paths(),
        }
    }
}

async fn show_transactions() -> Result<()> {
    let mut service = cli::service()?;
    let mut transactions = service.load().await?.transactions;
    transactions.sort_by_key(|t| t.date);

    for t in &transactions {
        println!(
            "{}  {:<9}  {:>12} {}  {}: {}",
            t.date.format("%Y-%m-%d"),
            t.kind.label(),
            t.amount,
            t.currency,
            t.category,
            t.description,
        );
    }
    info!(count = transactions.len(), "Transactions listed");

    Ok(())
}

async fn show_summary() -> Result<()> {
    let mut service = cli::service()?;
    let document = service.load().await?;
    let summary = Summary::of(&document.transactions);

    println!("Assets:      {:>14} USD", summary.assets);
    println!("Liabilities: {:>14} USD", summary.liabilities);
    println!("Income:      {:>14} USD", summary.income);
    println!("Expenses:    {:>14} USD", summary.expenses);
    println!();
    println!("Net worth:   {:>14} USD", summary.net_worth());
    println!("Cash flow:   {:>14} USD", summary.cash_flow());

    let backend = match service.active_backend() {
        Backend::Remote => "remote (Google Drive)",
        Backend::Local => "local",
    };
    info!(backend, "Summary computed");

    Ok(())
}

fn show_paths() -> Result<()> {
    let config_path = Config::config_file()?;
    let data_dir = Config::data_dir()?;

    info!(path = ?config_path, "Config path");
    info!(path = ?data_dir, "Data path");

    Ok(())
}

/// Per-kind totals in USD at the fixed conversion rates.
#[derive(Debug, Default, PartialEq)]
struct Summary {
    assets: Decimal,
    liabilities: Decimal,
    income: Decimal,
    expenses: Decimal,
}

impl Summary {
    fn of(transactions: &[Transaction]) -> Self {
        let mut summary = Summary::default();

        for t in transactions {
            let usd = t.currency.to_usd(t.amount);
            match t.kind {
                TransactionKind::Asset => summary.assets += usd,
                TransactionKind::Liability => summary.liabilities += usd,
                TransactionKind::Income => summary.income += usd,
                TransactionKind::Expense => summary.expenses += usd,
            }
        }

        summary
    }

    fn net_worth(&self) -> Decimal {
        self.assets - self.liabilities
    }

    fn cash_flow(&self) -> Decimal {
        self.income - self.expenses
    }
}
