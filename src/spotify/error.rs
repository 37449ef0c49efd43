//! Error types for the Spotify client core.
//!
//! [`ServiceError`] is what the Web API reported; [`Error`] is everything a
//! call through the [`Client`](super::Client) can end with.

use chrono::{DateTime, Utc};
use reqwest::{
    StatusCode,
    header::{CONTENT_TYPE, HeaderMap},
};
use serde::Deserialize;

use super::retry;

/// Upper bound for the raw body embedded into an undecodable error message.
const MAX_DIAGNOSTIC_BODY: usize = 512;

/// A failure reported by the Spotify Web API.
///
/// Built only from a non-success HTTP response. The status is always the
/// transport-level status code, whatever the body claims.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (HTTP {})", .status.as_u16())]
pub struct ServiceError {
    message: String,
    status: StatusCode,
    retry_after: Option<DateTime<Utc>>,
}

impl ServiceError {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Earliest instant the service asked us to come back, if it sent a
    /// usable `Retry-After` header.
    pub fn retry_after(&self) -> Option<DateTime<Utc>> {
        self.retry_after
    }

    /// Reads the body of a failed response and decodes it.
    ///
    /// Never fails: if the body cannot even be read, the read failure becomes
    /// the message so the caller can still branch on the status.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        match response.bytes().await {
            Ok(body) => decode_error(status, &headers, &body),
            Err(e) => ServiceError {
                message: format!("failed to read error response body: {e}"),
                status,
                retry_after: retry_after_instant(&headers, Utc::now()),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Turns the parts of a failed response into a [`ServiceError`].
///
/// - no `Content-Type`: the body is the message, or the canonical reason
///   phrase when the body is empty too
/// - `Content-Type` with an empty body: a fixed "without body" message
/// - otherwise the `{"error": {"message": ..}}` envelope; a body that does
///   not parse is embedded (truncated) into a diagnostic message
pub fn decode_error(status: StatusCode, headers: &HeaderMap, body: &[u8]) -> ServiceError {
    let message = if !headers.contains_key(CONTENT_TYPE) {
        if body.is_empty() {
            reason_phrase(status)
        } else {
            String::from_utf8_lossy(body).into_owned()
        }
    } else if body.is_empty() {
        "server response without body".to_string()
    } else {
        match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.error.message,
            Err(e) => undecodable_body(body, &e),
        }
    };

    // e.g. a request rejected for an over-long URL comes back with an empty
    // description
    let message = if message.is_empty() {
        "server response without error description".to_string()
    } else {
        message
    };

    ServiceError {
        message,
        status,
        retry_after: retry_after_instant(headers, Utc::now()),
    }
}

fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

fn undecodable_body(body: &[u8], err: &serde_json::Error) -> String {
    let shown = &body[..body.len().min(MAX_DIAGNOSTIC_BODY)];
    let ellipsis = if body.len() > MAX_DIAGNOSTIC_BODY { "..." } else { "" };
    format!(
        "couldn't decode error response ({len} bytes, {err}): [{raw}{ellipsis}]",
        len = body.len(),
        raw = String::from_utf8_lossy(shown),
    )
}

fn retry_after_instant(headers: &HeaderMap, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(retry::retry_after_secs(headers)?).ok()?;
    now.checked_add_signed(chrono::Duration::try_seconds(secs)?)
}

/// Every way a call through the client can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The HTTP exchange itself failed (DNS, connect, TLS, reading a body).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The service answered with a failure.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A success body did not match the expected shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request could not be built (malformed URL, invalid header).
    #[error("invalid request: {0}")]
    InvalidRequest(#[source] reqwest::Error),

    /// The configured base URL cannot be extended with a resource path.
    #[error("invalid base URL {0}")]
    InvalidUrl(String),

    /// The request body is a stream and cannot be sent a second time.
    #[error("request body cannot be replayed for a retry")]
    UnreplayableRequest,

    /// A page that was never fetched was handed to the page walker.
    #[error("page has not been fetched from the service yet")]
    UnfetchedPage,

    /// The page walker reached the end in the requested direction.
    #[error("no more pages")]
    NoMorePages,

    /// The call's cancellation token fired.
    #[error("request cancelled")]
    Cancelled,
}

impl Error {
    /// HTTP status behind the error: the service's answer for
    /// [`Error::Service`], or the status a transport error carries.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Service(e) => Some(e.status()),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn as_service(&self) -> Option<&ServiceError> {
        match self {
            Error::Service(e) => Some(e),
            _ => None,
        }
    }
}
