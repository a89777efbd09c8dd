//! Request authentication for the BusTime API.
//!
//! The upstream service accepts three authentication schemes, selected per
//! endpoint family:
//! - `LegacySigned` ("v2"): API key in a `key` header, HMAC signature headers
//! - `QueryKeySigned` ("v3"): API key as a `key` query parameter, HMAC
//!   signature headers computed over the URL *including* that parameter
//! - `BareKey`: API key as a query parameter, no signature
//!
//! Signing never touches the request body.

mod credentials;
mod error;
mod signer;

pub use credentials::Credentials;
pub use error::AuthError;
pub use signer::{AuthScheme, Signer, extract_api_path, format_fixdate, request_hash};
