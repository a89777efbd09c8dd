//! Authentication error types.

/// Errors that can occur while signing a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The request URL has no `/api/` segment to sign.
    #[error("URL has no API path to sign: {url}")]
    MissingApiPath { url: String },

    /// A credential or computed value is not a valid HTTP header value.
    #[error("invalid header value for {header}")]
    InvalidHeader { header: &'static str },

    /// The HMAC key was rejected by the MAC implementation.
    ///
    /// HMAC-SHA256 accepts keys of any length, so signing never produces
    /// this; it covers the fallible key-init API of the `hmac` crate.
    #[error("invalid HMAC key")]
    InvalidHmacKey,
}
