//! Configuration management for storyrelay
//!
//! Settings come from environment variables (optionally seeded from a `.env`
//! file). A `Config` is built once at startup and shared with the handlers
//! and the completion client.

use crate::error::{AppError, AppResult};
use std::path::Path;
use tokio::net::TcpListener;

/// Environment variable holding the completion provider API key
pub const API_KEY_VAR: &str = "GROQ_API_KEY";
/// Environment variable overriding the provider base URL
pub const BASE_URL_VAR: &str = "BASE_URL";
/// Environment variable for the listen address
pub const HOST_VAR: &str = "FLASK_HOST";
/// Environment variable for the listen port
pub const PORT_VAR: &str = "FLASK_PORT";
/// Environment variable for the default log level
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Provider endpoint used when `BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Root configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmSettings,
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Bind the listen socket
    ///
    /// `host` may be an IP literal or a hostname. Hostnames are resolved and
    /// the first address that binds is used, so `localhost` stays on loopback.
    pub async fn bind(&self) -> AppResult<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                AppError::Config(format!(
                    "failed to bind {}:{} (check {} and {}): {}",
                    self.host, self.port, HOST_VAR, PORT_VAR, e
                ))
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Completion provider settings
///
/// The credential is kept optional so that a missing key surfaces as a
/// `Config` error from [`LlmSettings::credential`] rather than a panic.
/// `Config::validate()` rejects a missing key at startup.
#[derive(Clone)]
pub struct LlmSettings {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl LlmSettings {
    /// Create settings from raw values; empty or whitespace-only values count as unset
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: non_empty(api_key),
            base_url: non_empty(base_url),
        }
    }

    /// The API credential, or a `Config` error when none is configured
    pub fn credential(&self) -> AppResult<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::Config(format!(
                "missing credential: set {} to your provider API key",
                API_KEY_VAR
            ))
        })
    }

    /// The provider base URL, or [`DEFAULT_BASE_URL`] when none is configured
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }
}

// Hand-written so the API key never ends up in logs.
impl std::fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url())
            .finish()
    }
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load a `.env` file into the process environment, then read it
    ///
    /// A missing file is not an error. Variables already present in the
    /// environment take precedence over the file.
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        match dotenvy::from_path(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "Loaded environment file"),
            Err(e) if e.not_found() => {
                tracing::debug!(path = %path.display(), "No environment file found, skipping")
            }
            Err(e) => {
                return Err(AppError::Config(format!(
                    "failed to read environment file '{}': {}",
                    path.display(),
                    e
                )));
            }
        }
        Self::from_env()
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Used by `from_env()` and by tests, which pass a map instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = non_empty(lookup(HOST_VAR)).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match non_empty(lookup(PORT_VAR)) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                AppError::Config(format!(
                    "{} must be a port number between 0 and 65535, got '{}': {}",
                    PORT_VAR, raw, e
                ))
            })?,
            None => DEFAULT_PORT,
        };

        let log_level =
            non_empty(lookup(LOG_LEVEL_VAR)).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            server: ServerConfig { host, port },
            llm: LlmSettings::new(lookup(API_KEY_VAR), lookup(BASE_URL_VAR)),
            observability: ObservabilityConfig { log_level },
        })
    }

    /// Validate configuration before the server starts
    ///
    /// A missing credential is fatal here so the process fails at startup
    /// instead of on the first request.
    pub fn validate(&self) -> AppResult<()> {
        self.llm.credential()?;

        let base_url = self.llm.base_url();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "{} must start with 'http://' or 'https://', got '{}'",
                BASE_URL_VAR, base_url
            )));
        }

        Ok(())
    }
}
