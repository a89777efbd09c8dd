//! API credentials.

use std::fmt;

/// Key material used to authenticate requests.
///
/// Both values are static secrets issued by the BusTime operator. They are
/// passed in explicitly so that tests can inject their own keys.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    hmac_key: String,
}

impl Credentials {
    /// Create credentials from an API key and an HMAC signing key.
    pub fn new(api_key: impl Into<String>, hmac_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            hmac_key: hmac_key.into(),
        }
    }

    /// The API key sent with every request.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The key used to compute `X-Request-ID` signatures.
    pub fn hmac_key(&self) -> &str {
        &self.hmac_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("hmac_key", &"<redacted>")
            .finish()
    }
}
