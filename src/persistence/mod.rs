mod service;

pub use service::{Backend, PersistenceService, REMOTE_DOCUMENT_NAME};
