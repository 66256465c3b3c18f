use crate::config::{Config, GoogleConfig, StorageMode};
use crate::drive::{self, DriveClient, DriveEndpoints, RemoteDocumentApi, RemoteDocumentHandle, TokenSet};
use crate::error::{AppError, Result};
use crate::models::StoredDocument;
use crate::store::{DOCUMENT_KEY, FileStore, KeyValueStore, TOKEN_KEY};
use tracing::{debug, instrument, warn};

/// Fixed name of the document in the remote store. Every instance pointing
/// at the same account shares this document.
pub const REMOTE_DOCUMENT_NAME: &str = "finance-tracker-data.json";

/// The backend a given save/load call will use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Local,
    Remote,
}

/// Owns storage-mode selection, the OAuth token lifecycle, remote document
/// discovery, and read/write of the transaction document. One instance per
/// process; `save`/`load` take `&mut self`, so in-process calls serialize
/// through the single owner.
pub struct PersistenceService<S, R> {
    mode: StorageMode,
    credentials: Option<GoogleConfig>,
    tokens: Option<TokenSet>,
    store: S,
    remote: R,
    http: reqwest::Client,
    endpoints: DriveEndpoints,
}

impl PersistenceService<FileStore, DriveClient> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let endpoints = DriveEndpoints::default();
        let remote = DriveClient::new(endpoints.clone())?;
        Self::new(config, FileStore::open()?, remote, endpoints)
    }
}

impl<S, R> PersistenceService<S, R>
where
    S: KeyValueStore,
    R: RemoteDocumentApi,
{
    /// Configure the service. No network I/O happens here; a token set
    /// persisted by a previous run is restored from the local store so
    /// remote mode is recognized without re-consent.
    pub fn new(config: &Config, store: S, remote: R, endpoints: DriveEndpoints) -> Result<Self> {
        let tokens = match config.mode {
            StorageMode::Remote => restore_tokens(&store)?,
            StorageMode::Local => None,
        };

        Ok(Self {
            mode: config.mode,
            credentials: config.google.clone(),
            tokens,
            store,
            remote,
            http: drive::http_client()?,
            endpoints,
        })
    }

    /// Which backend the next save/load will use. Remote requires both the
    /// configured mode and a present token set; resolved fresh per call.
    pub fn active_backend(&self) -> Backend {
        match (self.mode, &self.tokens) {
            (StorageMode::Remote, Some(_)) => Backend::Remote,
            _ => Backend::Local,
        }
    }

    /// Build the provider consent-page URL.
    pub fn authorization_url(&self) -> Result<String> {
        let credentials = self.credentials()?;
        drive::auth::authorization_url(&self.endpoints, credentials)
    }

    /// Exchange a one-time authorization code for a token set and persist it
    /// so later runs start in remote mode without re-consent.
    #[instrument(name = "Completing Google Drive authorization", skip_all)]
    pub async fn complete_authorization(&mut self, code: &str) -> Result<()> {
        let credentials = self.credentials()?;

        let tokens =
            drive::auth::exchange_code(&self.http, &self.endpoints, credentials, code).await?;
        self.tokens = Some(tokens);
        self.persist_tokens()?;

        debug!("Authorization complete, token set stored");

        Ok(())
    }

    /// Persist the document to the active backend. A failed remote save
    /// always leaves a best-effort local copy behind before surfacing the
    /// error, so no caller data is silently lost.
    #[instrument(name = "Saving document", skip_all)]
    pub async fn save(&mut self, document: &StoredDocument) -> Result<()> {
        let payload = serde_json::to_string(document)?;

        match self.active_backend() {
            Backend::Local => {
                debug!("Saving to local store");
                self.store.set(DOCUMENT_KEY, &payload)
            }
            Backend::Remote => self.save_remote(&payload).await,
        }
    }

    /// Read the document from the active backend. Remote API failures are
    /// logged and degrade to the local copy; only a failed token refresh
    /// propagates, so the caller can tell "session expired" apart from "the
    /// network is down".
    #[instrument(name = "Loading document", skip_all)]
    pub async fn load(&mut self) -> Result<StoredDocument> {
        match self.active_backend() {
            Backend::Local => self.load_local(),
            Backend::Remote => self.load_remote().await,
        }
    }

    async fn save_remote(&mut self, payload: &str) -> Result<()> {
        let access_token = self.fresh_access_token().await?;

        let Some(handle) = self.resolve_remote_document(&access_token).await else {
            self.best_effort_local_write(payload);
            return Err(AppError::RemoteUnavailable);
        };

        match self
            .remote
            .upload_content(&access_token, &handle, payload)
            .await
        {
            Ok(()) => {
                debug!(file_id = %handle.file_id, "Document uploaded");
                Ok(())
            }
            Err(AppError::RemoteApi { status, body }) => {
                self.best_effort_local_write(payload);
                Err(AppError::RemoteWriteFailed { status, body })
            }
            Err(e) => {
                self.best_effort_local_write(payload);
                Err(e)
            }
        }
    }

    async fn load_remote(&mut self) -> Result<StoredDocument> {
        let access_token = self.fresh_access_token().await?;

        let Some(handle) = self.resolve_remote_document(&access_token).await else {
            warn!("Remote document could not be resolved, reading local copy");
            return self.load_local();
        };

        match self.remote.download_content(&access_token, &handle).await {
            Ok(body) if body.trim().is_empty() => Ok(StoredDocument::default()),
            Ok(body) => match serde_json::from_str(&body) {
                Ok(document) => Ok(document),
                Err(e) => {
                    warn!(error = %e, "Remote document is not valid JSON, reading local copy");
                    self.load_local()
                }
            },
            Err(e) => {
                warn!(error = %e, "Remote read failed, reading local copy");
                self.load_local()
            }
        }
    }

    fn load_local(&self) -> Result<StoredDocument> {
        match self.store.get(DOCUMENT_KEY)? {
            None => Ok(StoredDocument::default()),
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|e| AppError::CorruptLocalData(e.to_string()))
            }
        }
    }

    /// Search the remote store for the well-known document name, creating it
    /// on a miss. `None` means the remote store is unusable for this call.
    async fn resolve_remote_document(&self, access_token: &str) -> Option<RemoteDocumentHandle> {
        match self.remote.find_file(access_token, REMOTE_DOCUMENT_NAME).await {
            Ok(Some(handle)) => Some(handle),
            Ok(None) => {
                debug!(name = REMOTE_DOCUMENT_NAME, "Document not found, creating");
                match self
                    .remote
                    .create_file(access_token, REMOTE_DOCUMENT_NAME)
                    .await
                {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        warn!(error = %e, "Failed to create remote document");
                        None
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to search for remote document");
                None
            }
        }
    }

    /// Pre-flight token check run before every remote call: refresh the token
    /// set iff it is expired. Refresh failures propagate; they never fall
    /// back to local within the same call.
    async fn fresh_access_token(&mut self) -> Result<String> {
        let Some(tokens) = self.tokens.as_ref() else {
            return Err(AppError::NotConfigured);
        };

        if !tokens.is_expired() {
            return Ok(tokens.access_token.clone());
        }

        debug!("Access token expired, refreshing");
        let credentials = self.credentials.as_ref().ok_or(AppError::NotConfigured)?;
        let refreshed =
            drive::auth::refresh_token_set(&self.http, &self.endpoints, credentials, tokens)
                .await?;

        let access_token = refreshed.access_token.clone();
        self.tokens = Some(refreshed);
        if let Err(e) = self.persist_tokens() {
            warn!(error = %e, "Failed to persist refreshed token set");
        }

        Ok(access_token)
    }

    fn credentials(&self) -> Result<&GoogleConfig> {
        self.credentials.as_ref().ok_or(AppError::NotConfigured)
    }

    fn persist_tokens(&self) -> Result<()> {
        if let Some(tokens) = &self.tokens {
            let raw = serde_json::to_string(tokens)?;
            self.store.set(TOKEN_KEY, &raw)?;
        }
        Ok(())
    }

    fn best_effort_local_write(&self, payload: &str) {
        if let Err(e) = self.store.set(DOCUMENT_KEY, payload) {
            warn!(error = %e, "Best-effort local write failed");
        } else {
            debug!("Kept a local copy of the unsynced document");
        }
    }
}

/// A corrupt persisted token blob is treated as absent so a bad file cannot
/// brick startup; the user just has to reconnect.
fn restore_tokens<S: KeyValueStore>(store: &S) -> Result<Option<TokenSet>> {
    let Some(raw) = store.get(TOKEN_KEY)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(tokens) => Ok(Some(tokens)),
        Err(e) => {
            warn!(error = %e, "Stored token set is unreadable, ignoring it");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod mocks {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Trait-level remote double with per-operation failure switches and a
    /// call log.
    #[derive(Clone, Default)]
    pub(super) struct MockRemote {
        pub(super) existing_file: Arc<Mutex<Option<String>>>,
        pub(super) uploaded: Arc<Mutex<Vec<String>>>,
        pub(super) remote_content: Arc<Mutex<Option<String>>>,
        pub(super) calls: Arc<Mutex<Vec<&'static str>>>,
        pub(super) fail_find: bool,
        pub(super) fail_upload: bool,
        pub(super) fail_download: bool,
    }

    impl MockRemote {
        pub(super) fn with_existing_file(file_id: &str) -> Self {
            let mock = Self::default();
            *mock.existing_file.lock().unwrap() = Some(file_id.to_string());
            mock
        }

        pub(super) fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl RemoteDocumentApi for MockRemote {
        async fn find_file(
            &self,
            _access_token: &str,
            _name: &str,
        ) -> Result<Option<RemoteDocumentHandle>> {
            self.record("find");
            if self.fail_find {
                return Err(AppError::RemoteApi {
                    status: 500,
                    body: "search exploded".to_string(),
                });
            }
            Ok(self
                .existing_file
                .lock()
                .unwrap()
                .clone()
                .map(|file_id| RemoteDocumentHandle { file_id }))
        }

        async fn create_file(
            &self,
            _access_token: &str,
            _name: &str,
        ) -> Result<RemoteDocumentHandle> {
            self.record("create");
            let file_id = "F_created".to_string();
            *self.existing_file.lock().unwrap() = Some(file_id.clone());
            Ok(RemoteDocumentHandle { file_id })
        }

        async fn upload_content(
            &self,
            _access_token: &str,
            _handle: &RemoteDocumentHandle,
            content: &str,
        ) -> Result<()> {
            self.record("upload");
            if self.fail_upload {
                return Err(AppError::RemoteApi {
                    status: 503,
                    body: "upload rejected".to_string(),
                });
            }
            self.uploaded.lock().unwrap().push(content.to_string());
            *self.remote_content.lock().unwrap() = Some(content.to_string());
            Ok(())
        }

        async fn download_content(
            &self,
            _access_token: &str,
            _handle: &RemoteDocumentHandle,
        ) -> Result<String> {
            self.record("download");
            if self.fail_download {
                return Err(AppError::RemoteApi {
                    status: 500,
                    body: "read exploded".to_string(),
                });
            }
            Ok(self
                .remote_content
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_default())
        }
    }
}
