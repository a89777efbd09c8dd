//! BusTime client configuration.

use crate::auth::{AuthScheme, Credentials};

/// Default base URL for v3 endpoints.
pub const DEFAULT_BASE_URL: &str = "https://mbus.ltp.umich.edu/bustime/api/v3";

/// Default base URL for the restricted v2 endpoints (nearby stops).
pub const DEFAULT_NEARBY_BASE_URL: &str = "https://mbus.ltp.umich.edu/bustime/api/restricted/v2";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for the BusTime client.
#[derive(Debug, Clone)]
pub struct BustimeConfig {
    /// API key and HMAC signing key
    pub credentials: Credentials,
    /// Base URL for v3 endpoints
    pub base_url: String,
    /// Base URL for the v2 nearby-stops endpoint
    pub nearby_base_url: String,
    /// Authentication scheme for v3 endpoints
    pub auth: AuthScheme,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Optional `User-Agent` header
    pub user_agent: Option<String>,
    /// Data feed to select up front
    pub data_feed: Option<String>,
}

impl BustimeConfig {
    /// Create a new config with the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            nearby_base_url: DEFAULT_NEARBY_BASE_URL.to_string(),
            auth: AuthScheme::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            data_feed: None,
        }
    }

    /// Set a custom v3 base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom v2 base URL (for testing).
    pub fn with_nearby_base_url(mut self, url: impl Into<String>) -> Self {
        self.nearby_base_url = url.into();
        self
    }

    /// Set the authentication scheme for v3 endpoints.
    pub fn with_auth(mut self, auth: AuthScheme) -> Self {
        self.auth = auth;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Send a `User-Agent` header with every request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Pre-select a data feed.
    pub fn with_data_feed(mut self, feed: impl Into<String>) -> Self {
        self.data_feed = Some(feed.into());
        self
    }
}
