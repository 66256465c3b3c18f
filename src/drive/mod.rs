pub mod auth;
pub mod client;
pub mod types;

pub use auth::TokenSet;
pub use client::{DriveClient, RemoteDocumentApi, RemoteDocumentHandle};

use crate::error::Result;
use std::time::Duration;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
const GOOGLE_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// Per-request deadline so a hung call cannot hang the caller indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoints of the OAuth provider and document API. Defaults point at
/// Google; tests point them at a local server.
#[derive(Debug, Clone)]
pub struct DriveEndpoints {
    pub auth_url: String,
    pub token_url: String,
    pub api_base_url: String,
    pub upload_base_url: String,
}

impl Default for DriveEndpoints {
    fn default() -> Self {
        Self {
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            api_base_url: GOOGLE_API_BASE_URL.to_string(),
            upload_base_url: GOOGLE_UPLOAD_BASE_URL.to_string(),
        }
    }
}

pub(crate) fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}
