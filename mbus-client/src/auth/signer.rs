//! Request signing.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Request;
use reqwest::header::{HeaderName, HeaderValue};
use sha2::Sha256;
use tracing::debug;

use super::credentials::Credentials;
use super::error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// RFC 7231 IMF-fixdate, e.g. `Mon, 02 Jan 2006 15:04:05 GMT`.
const FIXDATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Marker for the start of the signed portion of a request URL.
const API_PATH_MARKER: &str = "/api/";

/// Query parameter and header name carrying the API key.
const KEY_PARAM: &str = "key";

const KEY_HEADER: HeaderName = HeaderName::from_static("key");
const DATE_HEADER: HeaderName = HeaderName::from_static("x-date");
const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// How a request carries its credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthScheme {
    /// "v2" scheme: `key`, `X-Date` and `X-Request-ID` headers.
    ///
    /// The signature covers the URL as built by the caller; the key is never
    /// added to the query string.
    LegacySigned,

    /// "v3" scheme: `key` query parameter plus `X-Date` and `X-Request-ID`
    /// headers.
    ///
    /// The key is added to the query string *before* the signature is
    /// computed, so the signed path includes `key=...`.
    #[default]
    QueryKeySigned,

    /// `key` query parameter only, without a signature.
    BareKey,
}

impl AuthScheme {
    /// Stamp `request` with credentials for this scheme.
    ///
    /// Deterministic for a given request, key pair and `now`. The server
    /// rejects stale signatures, so a signed request should be sent promptly
    /// rather than re-sent later.
    pub fn sign(
        self,
        request: &mut Request,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        match self {
            AuthScheme::LegacySigned => {
                let api_key = header_value(KEY_PARAM, credentials.api_key())?;
                apply_signature(request, credentials, now)?;
                request.headers_mut().insert(KEY_HEADER, api_key);
            }
            AuthScheme::QueryKeySigned => {
                set_key_param(request, credentials.api_key());
                apply_signature(request, credentials, now)?;
            }
            AuthScheme::BareKey => {
                set_key_param(request, credentials.api_key());
            }
        }

        debug!(scheme = ?self, url = %redacted_url(request), "signed request");
        Ok(())
    }
}

/// Signs requests with a fixed key pair and scheme.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
    scheme: AuthScheme,
}

impl Signer {
    /// Create a signer for the given credentials and scheme.
    pub fn new(credentials: Credentials, scheme: AuthScheme) -> Self {
        Self {
            credentials,
            scheme,
        }
    }

    /// The scheme this signer applies.
    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    /// A signer with the same credentials but a different scheme.
    pub fn with_scheme(&self, scheme: AuthScheme) -> Self {
        Self {
            credentials: self.credentials.clone(),
            scheme,
        }
    }

    /// Sign `request` as of `now`.
    pub fn sign(&self, request: &mut Request, now: DateTime<Utc>) -> Result<(), AuthError> {
        self.scheme.sign(request, &self.credentials, now)
    }
}

/// Extract the signed portion of a URL: everything from `/api/` onwards,
/// query string included.
///
/// Returns `None` if the URL has no `/api/` segment.
pub fn extract_api_path(url: &str) -> Option<&str> {
    url.find(API_PATH_MARKER).map(|idx| &url[idx..])
}

/// Format a timestamp as an RFC 7231 fixed HTTP date in UTC.
pub fn format_fixdate(time: DateTime<Utc>) -> String {
    time.format(FIXDATE_FORMAT).to_string()
}

/// Compute the `X-Request-ID` value: hex HMAC-SHA256 of `api_path + fixdate`.
pub fn request_hash(api_path: &str, fixdate: &str, hmac_key: &str) -> Result<String, AuthError> {
    let mut mac =
        HmacSha256::new_from_slice(hmac_key.as_bytes()).map_err(|_| AuthError::InvalidHmacKey)?;
    mac.update(api_path.as_bytes());
    mac.update(fixdate.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Add the `X-Date` and `X-Request-ID` headers for the request's current URL.
fn apply_signature(
    request: &mut Request,
    credentials: &Credentials,
    now: DateTime<Utc>,
) -> Result<(), AuthError> {
    let url = request.url().as_str();
    let api_path = extract_api_path(url).ok_or_else(|| AuthError::MissingApiPath {
        url: url.to_string(),
    })?;

    let fixdate = format_fixdate(now);
    let hash = request_hash(api_path, &fixdate, credentials.hmac_key())?;

    let date = header_value("X-Date", &fixdate)?;
    let request_id = header_value("X-Request-ID", &hash)?;

    let headers = request.headers_mut();
    headers.insert(DATE_HEADER, date);
    headers.insert(REQUEST_ID_HEADER, request_id);
    Ok(())
}

/// Set the `key` query parameter, replacing any existing value.
fn set_key_param(request: &mut Request, api_key: &str) {
    let url = request.url_mut();
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| name != KEY_PARAM)
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(KEY_PARAM, api_key);
}

fn header_value(header: &'static str, value: &str) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(value).map_err(|_| AuthError::InvalidHeader { header })
}

/// The request URL with the `key` parameter masked, for logging.
fn redacted_url(request: &Request) -> String {
    let mut url = request.url().clone();
    if url.query_pairs().any(|(name, _)| name == KEY_PARAM) {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(name, value)| {
                if name == KEY_PARAM {
                    (name.into_owned(), "<redacted>".to_string())
                } else {
                    (name.into_owned(), value.into_owned())
                }
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.to_string()
}
