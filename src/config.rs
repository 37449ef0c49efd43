//! Configuration management for the Spotify client core.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults
//!
//! Token acquisition is not part of this crate. The access token is expected
//! to be produced by an external OAuth2 flow and handed over through
//! `SPOTIFY_ACCESS_TOKEN`.

use std::{env, io, path::PathBuf, time::Duration};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

/// Base URL of the Spotify Web API.
pub const DEFAULT_BASE_URL: &str = "https://api.spotify.com/v1/";

/// Retries one call may spend before a retryable status becomes terminal.
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 5;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const VAR_API_URL: &str = "SPOTIFY_API_URL";
const VAR_AUTO_RETRY: &str = "SPOTIFY_AUTO_RETRY";
const VAR_MAX_RETRY_SECS: &str = "SPOTIFY_MAX_RETRY_SECS";
const VAR_MAX_RETRY_ATTEMPTS: &str = "SPOTIFY_MAX_RETRY_ATTEMPTS";
const VAR_ACCEPT_LANGUAGE: &str = "SPOTIFY_ACCEPT_LANGUAGE";
const VAR_ACCESS_TOKEN: &str = "SPOTIFY_ACCESS_TOKEN";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot prepare config directory: {0}")]
    Io(#[from] io::Error),
    #[error("cannot load .env file: {0}")]
    Dotenv(#[from] dotenv::Error),
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
    #[error("access token contains characters not allowed in a header")]
    InvalidToken,
    #[error("cannot build HTTP transport: {0}")]
    Transport(#[source] reqwest::Error),
}

/// Settings shared read-only by every call a [`Client`](crate::spotify::Client)
/// makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for endpoint paths. Always ends in `/` once handed to a client.
    pub base_url: String,
    /// Wait out 429 / 202 responses instead of failing on them.
    pub auto_retry: bool,
    /// Longest single wait the client accepts; longer `Retry-After` values
    /// fail the call immediately.
    pub max_retry_duration: Option<Duration>,
    pub max_retry_attempts: u32,
    /// Sent as `Accept-Language` on every request.
    pub accept_language: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auto_retry: false,
            max_retry_duration: None,
            max_retry_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
            accept_language: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..self
        }
        .normalized()
    }

    pub fn with_auto_retry(self, auto_retry: bool) -> Self {
        Self { auto_retry, ..self }
    }

    pub fn with_max_retry_duration(self, max: Duration) -> Self {
        Self {
            max_retry_duration: Some(max),
            ..self
        }
    }

    pub fn with_max_retry_attempts(self, max_retry_attempts: u32) -> Self {
        Self {
            max_retry_attempts,
            ..self
        }
    }

    pub fn with_accept_language(self, language: impl Into<String>) -> Self {
        Self {
            accept_language: Some(language.into()),
            ..self
        }
    }

    /// Loads the configuration from the process environment.
    ///
    /// Variables:
    /// - `SPOTIFY_API_URL` (default: `https://api.spotify.com/v1/`)
    /// - `SPOTIFY_AUTO_RETRY` (`true`/`false`, default: `false`)
    /// - `SPOTIFY_MAX_RETRY_SECS` (default: unlimited)
    /// - `SPOTIFY_MAX_RETRY_ATTEMPTS` (default: 5)
    /// - `SPOTIFY_ACCEPT_LANGUAGE` (default: none)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(VAR_API_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(VAR_AUTO_RETRY) {
            config.auto_retry = parse_bool(VAR_AUTO_RETRY, &raw)?;
        }
        if let Some(raw) = lookup(VAR_MAX_RETRY_SECS) {
            let secs = parse_number(VAR_MAX_RETRY_SECS, &raw)?;
            config.max_retry_duration = Some(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(VAR_MAX_RETRY_ATTEMPTS) {
            let attempts = parse_number(VAR_MAX_RETRY_ATTEMPTS, &raw)?;
            config.max_retry_attempts =
                u32::try_from(attempts).map_err(|_| ConfigError::InvalidValue {
                    var: VAR_MAX_RETRY_ATTEMPTS,
                    value: raw,
                })?;
        }
        config.accept_language = lookup(VAR_ACCEPT_LANGUAGE).filter(|v| !v.trim().is_empty());

        Ok(config.normalized())
    }

    pub(crate) fn normalized(mut self) -> Self {
        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }
        self
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
        }),
    }
}

fn parse_number(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
        })
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives at:
/// - Linux: `~/.local/share/sporlapi/.env`
/// - macOS: `~/Library/Application Support/sporlapi/.env`
/// - Windows: `%LOCALAPPDATA%/sporlapi/.env`
///
/// A missing file is fine; variables may come from the environment alone.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlapi/.env");
    path
}

/// Returns the access token handed over by the external OAuth2 flow.
pub fn access_token() -> Result<String, ConfigError> {
    env::var(VAR_ACCESS_TOKEN)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .ok_or(ConfigError::Missing(VAR_ACCESS_TOKEN))
}

/// Builds a transport that signs every request with `token`.
///
/// # Arguments
///
/// * `token` - OAuth2 access token; surrounding whitespace is ignored
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(reqwest::Client)` - Transport sending `Authorization: Bearer <token>`
///   (marked sensitive) and the crate's user agent on every request
/// - `Err(ConfigError::InvalidToken)` - The token cannot be a header value
/// - `Err(ConfigError::Transport)` - The HTTP client could not be built
///
/// # Example
///
/// ```no_run
/// use sporlapi::{config, spotify::Client};
///
/// # fn demo() -> Result<(), sporlapi::config::ConfigError> {
/// let transport = config::authorized_transport(&config::access_token()?)?;
/// let client = Client::new(transport, config::ClientConfig::from_env()?);
/// # let _ = client;
/// # Ok(())
/// # }
/// ```
pub fn authorized_transport(token: &str) -> Result<reqwest::Client, ConfigError> {
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
        .map_err(|_| ConfigError::InvalidToken)?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer);

    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(ConfigError::Transport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SPOTIFY_API_URL", "http://localhost:8080/v1"),
            ("SPOTIFY_AUTO_RETRY", "yes"),
            ("SPOTIFY_MAX_RETRY_SECS", "30"),
            ("SPOTIFY_MAX_RETRY_ATTEMPTS", "2"),
            ("SPOTIFY_ACCEPT_LANGUAGE", "de"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080/v1/");
        assert!(config.auto_retry);
        assert_eq!(config.max_retry_duration, Some(Duration::from_secs(30)));
        assert_eq!(config.max_retry_attempts, 2);
        assert_eq!(config.accept_language.as_deref(), Some("de"));
    }

    #[test]
    fn test_rejects_malformed_values() {
        let err = ClientConfig::from_lookup(lookup(&[("SPOTIFY_AUTO_RETRY", "maybe")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                var: "SPOTIFY_AUTO_RETRY",
                ..
            }
        ));

        let err = ClientConfig::from_lookup(lookup(&[("SPOTIFY_MAX_RETRY_SECS", "ten")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_with_setters_chain() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9000")
            .with_auto_retry(true)
            .with_max_retry_duration(Duration::from_secs(3))
            .with_accept_language("fr");

        assert_eq!(config.base_url, "http://127.0.0.1:9000/");
        assert!(config.auto_retry);
        assert_eq!(config.max_retry_duration, Some(Duration::from_secs(3)));
        assert_eq!(config.accept_language.as_deref(), Some("fr"));
    }

    #[test]
    fn test_transport_rejects_header_breaking_tokens() {
        assert!(matches!(
            authorized_transport("abc\ndef"),
            Err(ConfigError::InvalidToken)
        ));
        assert!(authorized_transport("BQC-token").is_ok());
    }
}
