pub mod currency;
pub mod document;
pub mod transaction;

pub use currency::Currency;
pub use document::StoredDocument;
pub use transaction::{Transaction, TransactionKind};
