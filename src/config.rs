use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR_PREFIX: &str = "finance-tracker";

const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/callback";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub mode: StorageMode,
    #[serde(default)]
    pub google: Option<GoogleConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

impl Config {
    /// Load config from disk. A missing file means local-only mode with no
    /// credentials, so the tracker works with zero setup.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.mode == StorageMode::Remote {
            let google = self.google.as_ref().ok_or_else(|| {
                AppError::Config(
                    "mode = \"remote\" requires a [google] section with client credentials"
                        .to_string(),
                )
            })?;
            if google.client_id.is_empty() || google.client_secret.is_empty() {
                return Err(AppError::Config(
                    "Google client_id and client_secret must be set in config file".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file("config.toml")
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))
    }

    /// Get the data directory path, used by the local key-value store
    pub fn data_dir() -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.get_data_home()
            .map(|home| home.join("store"))
            .ok_or_else(|| AppError::Config("Failed to determine data directory".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = Config {
            mode: StorageMode::Remote,
            google: Some(GoogleConfig {
                client_id: "test_client_id".to_string(),
                client_secret: "test_client_secret".to_string(),
                redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            }),
        };

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.mode, deserialized.mode);
        assert_eq!(
            config.google.as_ref().unwrap().client_id,
            deserialized.google.as_ref().unwrap().client_id
        );
    }

    #[test]
    fn test_default_mode_is_local() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.mode, StorageMode::Local);
        assert!(config.google.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_remote_mode_requires_credentials() {
        let config: Config = toml::from_str("mode = \"remote\"").unwrap();
        assert!(config.validate().is_err());

        let config: Config = toml::from_str(
            r#"
            mode = "remote"

            [google]
            client_id = ""
            client_secret = ""
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_redirect_uri_defaults() {
        let config: Config = toml::from_str(
            r#"
            mode = "remote"

            [google]
            client_id = "id"
            client_secret = "secret"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.google.unwrap().redirect_uri,
            "http://localhost:3000/callback"
        );
    }
}
