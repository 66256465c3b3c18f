use crate::error::{AppError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

/// Key under which the OAuth token set is persisted.
pub const TOKEN_KEY: &str = "google_drive_tokens";

/// Key under which the transaction document is persisted.
pub const DOCUMENT_KEY: &str = "finance_tracker_document";

/// Synchronous key->string store, persisted across process restarts.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// On-disk store: one file per key under the application data directory.
/// Files hold credentials, so they are created with 0600 permissions.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open() -> Result<Self> {
        Ok(Self::at(crate::config::Config::data_dir()?))
    }

    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::LocalWriteFailed(format!("{:?}: {}", parent, e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(0o600)
            .open(&path)
            .map_err(|e| AppError::LocalWriteFailed(format!("{:?}: {}", path, e)))?;

        file.write_all(value.as_bytes())
            .map_err(|e| AppError::LocalWriteFailed(format!("{:?}: {}", path, e)))?;

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_helpers::MemoryStore;
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::at(dir.path().to_path_buf());

        assert!(store.get(DOCUMENT_KEY).unwrap().is_none());

        store.set(DOCUMENT_KEY, r#"{"transactions":[]}"#).unwrap();
        assert_eq!(
            store.get(DOCUMENT_KEY).unwrap().as_deref(),
            Some(r#"{"transactions":[]}"#)
        );
    }

    #[test]
    fn test_file_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::at(dir.path().to_path_buf());

        store.set(TOKEN_KEY, "first").unwrap();
        store.set(TOKEN_KEY, "second").unwrap();

        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("second"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::at(dir.path().to_path_buf());
        store.set(TOKEN_KEY, "secret").unwrap();

        let metadata = std::fs::metadata(dir.path().join(format!("{}.json", TOKEN_KEY))).unwrap();
        assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn test_memory_store_failure_mode() {
        let store = MemoryStore::failing();
        assert!(matches!(
            store.set(DOCUMENT_KEY, "x"),
            Err(AppError::LocalWriteFailed(_))
        ));
    }
}
