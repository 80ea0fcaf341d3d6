//! Client configuration.
//!
//! Values come from a TOML file, then `CONNECTIONS_*` environment
//! variables, then command-line flags, each layer overriding the last.

use connections_core::{DEFAULT_MAX_WRONG_TRIES, Rules};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable overriding the backend URL.
pub const API_URL_ENV: &str = "CONNECTIONS_API_URL";

/// Environment variable carrying the access token.
pub const AUTH_TOKEN_ENV: &str = "CONNECTIONS_AUTH_TOKEN";

/// Configuration for the puzzle client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST backend, including the `/api` prefix.
    #[serde(default = "default_api_url")]
    api_url: String,

    /// Wrong submissions allowed before a game is lost.
    #[serde(default = "default_max_wrong_tries")]
    max_wrong_tries: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Access token sent as a bearer token.
    #[serde(default)]
    auth_token: Option<String>,

    /// Play offline from this JSON file instead of the backend.
    #[serde(default)]
    puzzles_file: Option<PathBuf>,
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_max_wrong_tries() -> u32 {
    DEFAULT_MAX_WRONG_TRIES
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            max_wrong_tries: default_max_wrong_tries(),
            request_timeout_secs: default_request_timeout_secs(),
            auth_token: None,
            puzzles_file: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(api_url = %config.api_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if given, otherwise defaults, then applies the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Applies environment overrides read through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            debug!(api_url = %url, "API URL from environment");
            self.api_url = url;
        }
        if let Some(token) = lookup(AUTH_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            debug!("Auth token from environment");
            self.auth_token = Some(token);
        }
        self
    }

    /// Overrides the backend URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Overrides the wrong-try budget.
    pub fn with_max_wrong_tries(mut self, max_wrong_tries: u32) -> Self {
        self.max_wrong_tries = max_wrong_tries;
        self
    }

    /// Switches to offline play from `path`.
    pub fn with_puzzles_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.puzzles_file = Some(path.into());
        self
    }

    /// Checks values that would otherwise fail later and less clearly.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::new(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.max_wrong_tries == 0 {
            return Err(ConfigError::new(
                "max_wrong_tries must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::new(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Session rules derived from this configuration.
    pub fn rules(&self) -> Rules {
        Rules::new(self.max_wrong_tries)
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
