//! `bustime-response` envelope validation.
//!
//! Every v3 response is wrapped in a `bustime-response` object that carries
//! either the endpoint's payload or a list of `{"msg": ...}` error records.
//! Errors are reported this way regardless of HTTP status, so a 200 response
//! can still be a failure.
//!
//! The upstream service has been observed to emit the invalid JSON escape
//! `\-` inside error messages, e.g.
//!
//! ```text
//! {"bustime-response": {"error": [{"msg": "No RTPI Data Feed parameter provided \- rtpidatafeed parameter must be provided for a multifeed site"}]}}
//! ```
//!
//! which strict decoders reject. [`repair_json_encoding`] rewrites each such
//! sequence to `--` before decoding.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::BustimeError;

/// A single error record from the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "msg")]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(rename = "bustime-response", default)]
    wrapper: Option<ErrorWrapper>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorWrapper {
    #[serde(default)]
    error: Option<Vec<ErrorMessage>>,
}

/// A response that passed the status check and whose envelope decoded.
///
/// Holds the repaired body so the caller can decode its payload from the
/// same bytes.
#[derive(Debug, Clone)]
pub struct CheckedResponse {
    body: Vec<u8>,
    errors: Vec<ErrorMessage>,
    repairs: usize,
}

impl CheckedResponse {
    /// True when the envelope carried no error records.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// All error records, in upstream order.
    pub fn errors(&self) -> &[ErrorMessage] {
        &self.errors
    }

    /// The first error message, which is the one callers act on.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    /// Number of `\-` sequences repaired in the body.
    pub fn repairs(&self) -> usize {
        self.repairs
    }

    /// The repaired body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Decode the repaired body into a payload type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, BustimeError> {
        serde_json::from_slice(&self.body).map_err(|e| BustimeError::malformed(&e, &self.body))
    }

    /// Turn the error records into a classified [`BustimeError::Api`].
    pub fn into_error(self) -> BustimeError {
        BustimeError::api(self.errors.into_iter().map(|e| e.message).collect())
    }
}

/// Rewrite every `\-` in `data` to `--`.
///
/// Only the backslash is replaced, so the output has the same length as the
/// input. Returns the repaired copy and the number of repairs.
pub fn repair_json_encoding(data: &[u8]) -> (Vec<u8>, usize) {
    let mut repaired = data.to_vec();
    let mut repairs = 0;

    for i in 0..data.len().saturating_sub(1) {
        if data[i] == b'\\' && data[i + 1] == b'-' {
            repaired[i] = b'-';
            repairs += 1;
        }
    }

    (repaired, repairs)
}

/// Fail on any status outside 200-299.
pub fn check_status(status: StatusCode) -> Result<(), BustimeError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(BustimeError::BadStatusCode(status.as_u16()))
    }
}

/// Repair and decode a buffered response body.
pub fn check_body(body: &[u8]) -> Result<CheckedResponse, BustimeError> {
    let (body, repairs) = repair_json_encoding(body);
    if repairs > 0 {
        info!(repairs, "repaired invalid \"\\-\" escape sequences");
    }

    let envelope: ErrorEnvelope =
        serde_json::from_slice(&body).map_err(|e| BustimeError::malformed(&e, &body))?;

    let errors = envelope
        .wrapper
        .and_then(|w| w.error)
        .unwrap_or_default();

    Ok(CheckedResponse {
        body,
        errors,
        repairs,
    })
}

/// Validate a transport response.
///
/// The body is only read when the status is 2xx.
pub async fn check_response(response: Response) -> Result<CheckedResponse, BustimeError> {
    check_status(response.status())?;
    let body = response.bytes().await?;
    check_body(&body)
}
