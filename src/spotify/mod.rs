//! # Spotify Integration Module
//!
//! This module is the request execution core of the crate and the thin set of
//! endpoint wrappers built on top of it.
//!
//! ## Architecture
//!
//! ```text
//! Endpoint wrappers (search, artists, playlist, player)
//!          ↓
//! Client
//!     ├── Request Executor (execute / get / send)
//!     │       ├── Retry Policy (429 / 202, Retry-After, ceilings)
//!     │       └── Error Model (ServiceError decoding)
//!     └── Page Walker (next_page / previous_page)
//!          ↓
//! HTTP transport (reqwest, signed by the caller)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Request Executor
//!
//! [`Client::execute`] is the single chokepoint for HTTP calls:
//! - **Success contract**: every 2xx is success, 204 never has its body read,
//!   and call sites may declare extra success codes (201, 202).
//! - **Rate limiting**: 429 and an undeclared 202 are waited out when
//!   auto-retry is on, bounded by a maximum wait and a maximum number of
//!   retries.
//! - **Cancellation**: every call takes a `CancellationToken`; both the
//!   network round trip and the back-off wait give way to it.
//! - **Decoding**: success bodies decode with `serde_json` into the caller's
//!   target; failures become a [`ServiceError`].
//!
//! ## Page Walker
//!
//! [`Client::next_page`] and [`Client::previous_page`] follow the absolute
//! URLs the service embeds in [`Page`] and [`CursorPage`] values and overwrite
//! the page the caller already holds.
//!
//! ## Authentication
//!
//! Token acquisition happens elsewhere. The client only needs a
//! `reqwest::Client` that signs requests, such as the one built by
//! [`crate::config::authorized_transport`].
//!
//! ## Thread Safety
//!
//! [`Client`] is cheap to clone and safe to share between tasks. The
//! configuration is immutable after construction and the transport pools
//! connections internally.

use std::sync::Arc;

use crate::config::ClientConfig;

pub mod artists;
pub mod error;
mod executor;
pub mod paging;
pub mod player;
pub mod playlist;
pub mod retry;
pub mod search;

pub use error::{Error, ServiceError};
pub use paging::{CursorPage, Cursors, Direction, Page, Pageable};
pub use retry::{RetryDecision, RetryPolicy};

/// Explicit client instance; every operation is a method on it.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    retry: RetryPolicy,
}

impl Client {
    /// Creates a client around a request-signing transport.
    pub fn new(http: reqwest::Client, config: ClientConfig) -> Self {
        let config = config.normalized();
        Self {
            retry: RetryPolicy::from_config(&config),
            config: Arc::new(config),
            http,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The transport requests handed to [`Client::execute`] should be built
    /// from.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Absolute URL for an endpoint path relative to the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{base}{path}",
            base = self.config.base_url,
            path = path.trim_start_matches('/')
        )
    }

    /// Absolute URL for a resource addressed by path segments below the base
    /// URL.
    ///
    /// Each segment is percent-encoded on its own, so an ID holding `/`, `?`
    /// or `#` stays inside its segment instead of reshaping the path.
    ///
    /// # Arguments
    ///
    /// * `segments` - Path segments in order, e.g. `["users", user_id, "playlists"]`
    ///
    /// # Returns
    ///
    /// The URL, or [`Error::InvalidUrl`] when the configured base URL cannot
    /// carry a path.
    pub fn resource(&self, segments: &[&str]) -> Result<reqwest::Url, Error> {
        let base = &self.config.base_url;
        let mut url = reqwest::Url::parse(base)
            .map_err(|e| Error::InvalidUrl(format!("{base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl(format!("{base}: cannot be a base")))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_path() {
        let client = Client::new(
            reqwest::Client::new(),
            ClientConfig {
                base_url: "http://localhost:9000/v1".to_string(),
                ..ClientConfig::default()
            },
        );
        assert_eq!(client.config().base_url, "http://localhost:9000/v1/");
        assert_eq!(
            client.endpoint("/me/following"),
            "http://localhost:9000/v1/me/following"
        );
        assert_eq!(
            client.endpoint("search"),
            "http://localhost:9000/v1/search"
        );
    }

    #[test]
    fn test_resource_encodes_each_segment() {
        let client = Client::new(
            reqwest::Client::new(),
            ClientConfig::default().with_base_url("http://localhost:9000/v1"),
        );
        let url = client.resource(&["users", "a/b?c#d", "playlists"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/v1/users/a%2Fb%3Fc%23d/playlists"
        );
        assert_eq!(
            client.resource(&["artists", "0oSGxfWSnnOXhD2fKuz2Gy", "albums"]).unwrap().as_str(),
            "http://localhost:9000/v1/artists/0oSGxfWSnnOXhD2fKuz2Gy/albums"
        );
    }

    #[test]
    fn test_resource_rejects_unusable_base_url() {
        let client = Client::new(
            reqwest::Client::new(),
            ClientConfig::default().with_base_url("not a url"),
        );
        let err = client.resource(&["search"]).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)), "got {err:?}");
    }

    #[test]
    fn test_retry_policy_follows_config() {
        let client = Client::new(
            reqwest::Client::new(),
            ClientConfig::default().with_auto_retry(true),
        );
        assert!(client.retry.enabled);
        assert_eq!(client.retry.max_wait, None);
    }
}
