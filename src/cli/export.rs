use crate::cli;
use crate::error::Result;
use crate::models::{StoredDocument, Transaction};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::info;

pub async fn export(path: &Path) -> Result<()> {
    let mut service = cli::service()?;
    let mut transactions = service.load().await?.transactions;
    transactions.sort_by_key(|t| t.date);

    let file = File::create(path)?;
    Transaction::write_csv(&transactions, file)?;

    info!(count = transactions.len(), path = %path.display(), "Exported transactions");

    Ok(())
}

pub async fn import(path: &Path) -> Result<()> {
    let file = File::open(path)?;
    let imported = Transaction::read_csv(file)?;
    let count = imported.len();

    let mut service = cli::service()?;
    let document = service.load().await?;

    // Upsert by id so re-importing the same file is harmless.
    let mut by_id: HashMap<String, Transaction> = document
        .transactions
        .into_iter()
        .map(|t| (t.id.clone(), t))
        .collect();
    for t in imported {
        by_id.insert(t.id.clone(), t);
    }

    let mut transactions: Vec<Transaction> = by_id.into_values().collect();
    transactions.sort_by_key(|t| t.date);

    cli::save_with_notice(&mut service, &StoredDocument::new(transactions)).await?;
    info!(count, path = %path.display(), "Imported transactions");

    Ok(())
}
