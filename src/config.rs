use crate::constants::*;
use std::env;

/// Persistence backend, resolved once at startup. Stores receive the built
/// backend by injection; there is no global mutable selection.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Filesystem,
    Remote(RemoteConfig),
}

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
    pub bucket: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: String,
    pub data_path: String,
    pub session_secret: String,
    pub backend: StorageBackend,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSessionSecret,
    InvalidSessionSecret(String),
    InvalidPort(String),
    UnknownStorageBackend(String),
    MissingRemoteSetting(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingSessionSecret => {
                write!(f, "SESSION_SECRET environment variable is required")
            }
            ConfigError::InvalidSessionSecret(msg) => {
                write!(f, "Invalid session secret: {}", msg)
            }
            ConfigError::InvalidPort(port) => {
                write!(f, "Invalid port number: {}", port)
            }
            ConfigError::UnknownStorageBackend(backend) => {
                write!(
                    f,
                    "Unknown storage backend '{}', expected 'filesystem' or 'remote'",
                    backend
                )
            }
            ConfigError::MissingRemoteSetting(var) => {
                write!(
                    f,
                    "{} environment variable is required for the remote storage backend",
                    var
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("SERVER_PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        let data_path = env::var("DATA_PATH").unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());

        // Validate port is a valid number
        if port.parse::<u16>().is_err() {
            return Err(ConfigError::InvalidPort(port));
        }

        // Get and validate session secret
        let session_secret =
            env::var("SESSION_SECRET").map_err(|_| ConfigError::MissingSessionSecret)?;

        if session_secret.len() < MIN_SESSION_SECRET_LENGTH {
            return Err(ConfigError::InvalidSessionSecret(format!(
                "must be at least {} characters long",
                MIN_SESSION_SECRET_LENGTH
            )));
        }

        let backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "filesystem".to_string())
            .to_lowercase()
            .as_str()
        {
            "filesystem" => StorageBackend::Filesystem,
            "remote" => {
                let base_url = env::var("STORAGE_URL")
                    .map_err(|_| ConfigError::MissingRemoteSetting("STORAGE_URL"))?;
                let api_key = env::var("STORAGE_KEY")
                    .map_err(|_| ConfigError::MissingRemoteSetting("STORAGE_KEY"))?;
                let bucket =
                    env::var("STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string());
                StorageBackend::Remote(RemoteConfig {
                    base_url,
                    api_key,
                    bucket,
                })
            }
            other => return Err(ConfigError::UnknownStorageBackend(other.to_string())),
        };

        Ok(Config {
            host,
            port,
            data_path,
            session_secret,
            backend,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
