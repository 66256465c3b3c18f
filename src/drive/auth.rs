use crate::config::GoogleConfig;
use crate::drive::DriveEndpoints;
use crate::drive::types::TokenResponse;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use url::Url;

// Access to files created or opened by the app
const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TokenSet {
    pub access_token: String,
    /// Absent if the provider withheld it.
    pub refresh_token: Option<String>,
    /// Expiry time as seconds since Unix epoch
    pub expires_at: i64,
}

impl TokenSet {
    /// Check if the access token is expired or about to expire (within 5 minutes)
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        // Refresh before actual expiry
        self.expires_at < (now + 300)
    }

    /// Build a token set from a token-endpoint response. A refresh response
    /// may omit `refresh_token`; the previous one is retained in that case.
    pub(crate) fn from_response(
        response: TokenResponse,
        previous_refresh_token: Option<String>,
    ) -> Self {
        let expires_in = response.expires_in.unwrap_or(3600) as i64;

        TokenSet {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh_token),
            expires_at: chrono::Utc::now().timestamp() + expires_in,
        }
    }
}

/// Build the provider consent-page URL. `access_type=offline` and
/// `prompt=consent` make the provider reliably issue a refresh token.
pub(crate) fn authorization_url(
    endpoints: &DriveEndpoints,
    credentials: &GoogleConfig,
) -> Result<String> {
    let mut url = Url::parse(&endpoints.auth_url)
        .map_err(|e| AppError::Config(format!("Invalid auth URL: {}", e)))?;

    url.query_pairs_mut()
        .append_pair("client_id", &credentials.client_id)
        .append_pair("redirect_uri", &credentials.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", DRIVE_FILE_SCOPE)
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent");

    Ok(url.into())
}

/// Exchange a one-time authorization code for a token set.
pub(crate) async fn exchange_code(
    http: &reqwest::Client,
    endpoints: &DriveEndpoints,
    credentials: &GoogleConfig,
    code: &str,
) -> Result<TokenSet> {
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("redirect_uri", credentials.redirect_uri.as_str()),
    ];

    let response = http.post(&endpoints.token_url).form(&params).send().await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::AuthExchangeFailed { status, body });
    }

    let token: TokenResponse = response.json().await?;
    Ok(TokenSet::from_response(token, None))
}

/// Exchange the stored refresh token for a fresh token set. All failures,
/// transport included, surface as `AuthRefreshFailed` so the caller can tell
/// an expired session apart from an unreachable document API.
pub(crate) async fn refresh_token_set(
    http: &reqwest::Client,
    endpoints: &DriveEndpoints,
    credentials: &GoogleConfig,
    current: &TokenSet,
) -> Result<TokenSet> {
    let refresh_token = current
        .refresh_token
        .as_deref()
        .ok_or_else(|| AppError::AuthRefreshFailed("no refresh token available".to_string()))?;

    let params = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
    ];

    let response = http
        .post(&endpoints.token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| AppError::AuthRefreshFailed(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::AuthRefreshFailed(format!("{} - {}", status, body)));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| AppError::AuthRefreshFailed(format!("invalid token response: {}", e)))?;

    Ok(TokenSet::from_response(
        token,
        current.refresh_token.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_credentials() -> GoogleConfig {
        GoogleConfig {
            client_id: "client_123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:3000/callback".to_string(),
        }
    }

    #[test]
    fn test_authorization_url_parameters() {
        let url = authorization_url(&DriveEndpoints::default(), &mock_credentials()).unwrap();
        let parsed = Url::parse(&url).unwrap();

        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("client_id".to_string(), "client_123".to_string())));
        assert!(pairs.contains(&(
            "redirect_uri".to_string(),
            "http://localhost:3000/callback".to_string()
        )));
        assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
        assert!(pairs.contains(&("scope".to_string(), DRIVE_FILE_SCOPE.to_string())));
        assert!(pairs.contains(&("access_type".to_string(), "offline".to_string())));
        assert!(pairs.contains(&("prompt".to_string(), "consent".to_string())));
    }

    #[test]
    fn test_expiry_buffer() {
        let now = chrono::Utc::now().timestamp();

        let fresh = TokenSet {
            access_token: "A".to_string(),
            refresh_token: None,
            expires_at: now + 3600,
        };
        assert!(!fresh.is_expired());

        let expiring_soon = TokenSet {
            access_token: "A".to_string(),
            refresh_token: None,
            expires_at: now + 60,
        };
        assert!(expiring_soon.is_expired());

        let expired = TokenSet {
            access_token: "A".to_string(),
            refresh_token: None,
            expires_at: now - 1,
        };
        assert!(expired.is_expired());
    }

    #[test]
    fn test_refresh_response_retains_previous_refresh_token() {
        let response = TokenResponse {
            access_token: "B".to_string(),
            refresh_token: None,
            expires_in: Some(3600),
        };

        let tokens = TokenSet::from_response(response, Some("R".to_string()));
        assert_eq!(tokens.access_token, "B");
        assert_eq!(tokens.refresh_token.as_deref(), Some("R"));
    }

    #[test]
    fn test_new_refresh_token_replaces_previous() {
        let response = TokenResponse {
            access_token: "B".to_string(),
            refresh_token: Some("R2".to_string()),
            expires_in: None,
        };

        let tokens = TokenSet::from_response(response, Some("R1".to_string()));
        assert_eq!(tokens.refresh_token.as_deref(), Some("R2"));
    }
}
