use crate::error::{AppError, Result};
use crate::models::Currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// A single ledger entry. The persistence layer passes these through
/// untouched; uniqueness of `id` within a document is the caller's job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Asset,
    Liability,
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Asset => "asset",
            TransactionKind::Liability => "liability",
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Transaction {
    /// Write transactions as CSV, headers included.
    pub fn write_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(writer);

        for t in transactions {
            writer
                .serialize(t)
                .map_err(|e| AppError::Csv(format!("Failed to serialize transaction: {}", e)))?;
        }

        writer
            .flush()
            .map_err(|e| AppError::Csv(format!("Failed to flush CSV: {}", e)))?;

        Ok(())
    }

    /// Read transactions from CSV produced by `write_csv` (or hand-edited
    /// with the same headers).
    pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let mut transactions = Vec::new();
        for (idx, record) in reader.deserialize().enumerate() {
            let transaction: Transaction = record
                .map_err(|e| AppError::Csv(format!("Failed to parse row {}: {}", idx + 2, e)))?;
            transactions.push(transaction);
        }

        Ok(transactions)
    }
}
