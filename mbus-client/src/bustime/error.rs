//! BusTime client error types.

use crate::auth::AuthError;
use crate::domain::NoCloseStop;

use super::classify::ApiErrorKind;

/// How much of a response body to keep in decode errors.
const BODY_EXCERPT_CHARS: usize = 500;

/// Errors from the BusTime HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum BustimeError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response status was outside 200-299
    #[error("bad status code: {0}")]
    BadStatusCode(u16),

    /// Response body did not decode into the expected shape
    #[error("malformed response: {message}")]
    MalformedEnvelope {
        message: String,
        body: Option<String>,
    },

    /// The `bustime-response` envelope carried error records
    #[error("{kind}: {}", first_message(.messages))]
    Api {
        kind: ApiErrorKind,
        messages: Vec<String>,
    },

    /// No stop was within the requested distance
    #[error(transparent)]
    NoCloseStop(#[from] NoCloseStop),

    /// The request could not be signed
    #[error("signing failed: {0}")]
    Auth(#[from] AuthError),

    /// A configured base URL is not a valid absolute URL
    #[error("invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl BustimeError {
    /// Build a domain error from envelope messages, classified by the first.
    pub fn api(messages: Vec<String>) -> Self {
        let kind = messages
            .first()
            .map_or(ApiErrorKind::Unclassified, |m| ApiErrorKind::from_message(m));
        BustimeError::Api { kind, messages }
    }

    /// Build a decode error, keeping an excerpt of the offending body.
    pub(crate) fn malformed(err: &serde_json::Error, body: &[u8]) -> Self {
        BustimeError::MalformedEnvelope {
            message: err.to_string(),
            body: Some(
                String::from_utf8_lossy(body)
                    .chars()
                    .take(BODY_EXCERPT_CHARS)
                    .collect(),
            ),
        }
    }

    /// The domain error kind, if this is a domain error.
    pub fn kind(&self) -> Option<ApiErrorKind> {
        match self {
            BustimeError::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// All upstream messages, if this is a domain error.
    pub fn messages(&self) -> &[String] {
        match self {
            BustimeError::Api { messages, .. } => messages,
            _ => &[],
        }
    }
}

fn first_message(messages: &[String]) -> &str {
    messages.first().map_or("", String::as_str)
}
