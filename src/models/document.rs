use crate::models::Transaction;
use serde::{Deserialize, Serialize};

/// The single persisted unit: every transaction in one JSON blob. Each save
/// replaces the whole document; there are no partial writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StoredDocument {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl StoredDocument {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_shape() {
        let json = serde_json::to_string(&StoredDocument::default()).unwrap();
        assert_eq!(json, r#"{"transactions":[]}"#);
    }

    #[test]
    fn test_missing_transactions_field_defaults_empty() {
        let document: StoredDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(document, StoredDocument::default());
    }
}
