use crate::cli;
use crate::error::{AppError, Result};
use crate::models::{Currency, Transaction, TransactionKind};
use chrono::{DateTime, Utc};
use clap::Args;
use rust_decimal::Decimal;
use tracing::info;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Kind of entry to record
    #[arg(long = "type", value_enum)]
    pub kind: TransactionKind,

    #[arg(long)]
    pub category: String,

    #[arg(long)]
    pub description: String,

    /// Amount in the given currency; must be non-negative
    #[arg(long)]
    pub amount: Decimal,

    #[arg(long, value_enum, default_value = "usd")]
    pub currency: Currency,

    /// Timestamp (RFC 3339); defaults to now
    #[arg(long)]
    pub date: Option<DateTime<Utc>>,
}

pub async fn execute(args: &AddArgs) -> Result<()> {
    if args.amount.is_sign_negative() {
        return Err(AppError::Config(
            "amount must be non-negative; pick the matching --type instead".to_string(),
        ));
    }

    let mut service = cli::service()?;
    let mut document = service.load().await?;

    let transaction = Transaction {
        id: uuid::Uuid::new_v4().to_string(),
        kind: args.kind,
        category: args.category.clone(),
        description: args.description.clone(),
        amount: args.amount,
        currency: args.currency,
        date: args.date.unwrap_or_else(Utc::now),
    };
    let id = transaction.id.clone();
    document.transactions.push(transaction);

    cli::save_with_notice(&mut service, &document).await?;
    info!(%id, "Transaction recorded");

    Ok(())
}
