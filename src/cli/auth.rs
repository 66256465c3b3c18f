use crate::cli;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::persistence::{Backend, PersistenceService};
use clap::Subcommand;
use tiny_http::{Response, Server};
use tracing::info;
use url::Url;

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Run the Google Drive consent flow
    Connect,
    /// Report which backend save/load will use
    Status,
}

impl AuthAction {
    pub async fn execute(&self) -> Result<()> {
        match self {
            AuthAction::Connect => connect().await,
            AuthAction::Status => status(),
        }
    }
}

async fn connect() -> Result<()> {
    let config = Config::load()?;
    let redirect_uri = config.google.as_ref().map(|g| g.redirect_uri.clone());

    let mut service = PersistenceService::from_config(&config)?;
    let consent_url = service.authorization_url()?;

    println!("Open this URL in your browser:\n{}", consent_url);
    println!();

    let code = match redirect_uri.as_deref().and_then(local_bind_addr) {
        Some(bind_addr) => {
            println!("Waiting for authorization...");
            receive_code(&bind_addr)?
        }
        // Redirect does not point at this machine; fall back to manual entry.
        None => dialoguer::Input::<String>::new()
            .with_prompt("Paste the authorization code")
            .interact_text()
            .map_err(|e| AppError::Config(format!("Failed to read authorization code: {}", e)))?,
    };

    service.complete_authorization(code.trim()).await?;
    info!("Google Drive connected; transactions will now sync remotely");

    Ok(())
}

fn status() -> Result<()> {
    let service = cli::service()?;

    match service.active_backend() {
        Backend::Remote => info!("Backend: remote (Google Drive)"),
        Backend::Local => info!("Backend: local"),
    }

    Ok(())
}

/// Bind address for the redirect listener, if the configured redirect URI
/// points at this machine.
fn local_bind_addr(redirect_uri: &str) -> Option<String> {
    let url = Url::parse(redirect_uri).ok()?;

    match url.host_str() {
        Some("localhost") | Some("127.0.0.1") => {
            let port = url.port_or_known_default()?;
            Some(format!("127.0.0.1:{}", port))
        }
        _ => None,
    }
}

/// Receive the one-time authorization code on a one-shot localhost server.
fn receive_code(bind_addr: &str) -> Result<String> {
    let server = Server::http(bind_addr)
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", bind_addr, e)))?;

    let request = server
        .recv()
        .map_err(|e| AppError::Config(format!("Failed to receive callback: {}", e)))?;

    let callback_url = format!("http://{}{}", bind_addr, request.url());
    let url = Url::parse(&callback_url)
        .map_err(|e| AppError::Config(format!("Failed to parse callback URL: {}", e)))?;

    let code = url
        .query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| AppError::Config("No code in callback".to_string()))?;

    let response = Response::from_string("Authorization complete! You can close this window.");
    request
        .respond(response)
        .map_err(|e| AppError::Config(format!("Failed to send response: {}", e)))?;

    Ok(code)
}
