use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("remote storage is not configured; set mode = \"remote\" and Google credentials")]
    NotConfigured,

    #[error("authorization code exchange failed: {status} - {body}")]
    AuthExchangeFailed { status: u16, body: String },

    #[error("token refresh failed: {0}")]
    AuthRefreshFailed(String),

    #[error("remote API error: {status} - {body}")]
    RemoteApi { status: u16, body: String },

    #[error("remote write failed (a local copy was kept): {status} - {body}")]
    RemoteWriteFailed { status: u16, body: String },

    #[error("remote document could not be resolved (a local copy was kept)")]
    RemoteUnavailable,

    #[error("local write failed: {0}")]
    LocalWriteFailed(String),

    #[error("local data is corrupt: {0}")]
    CorruptLocalData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
