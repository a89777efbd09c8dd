//! BusTime API client.
//!
//! This module provides an HTTP client for BusTime-family real-time transit
//! APIs, as deployed for the University of Michigan Magic Bus.
//!
//! Key characteristics of BusTime:
//! - v3 responses are wrapped in a `bustime-response` object, and failures
//!   are reported inside it as `{"msg": ...}` records, even with HTTP 200
//! - error messages are free text and are classified by substring
//! - the service occasionally emits the invalid JSON escape `\-`, which is
//!   repaired before decoding
//! - some endpoints need a data feed (`rtpidatafeed`) on multi-feed sites

mod api;
mod classify;
mod client;
mod config;
mod envelope;
mod error;
mod types;

pub use api::BusApi;
pub use classify::{
    ApiErrorKind, EMPTY_RESULT_MESSAGES, classify, is_empty_result, message_is,
};
pub use client::BustimeClient;
pub use config::{BustimeConfig, DEFAULT_BASE_URL, DEFAULT_NEARBY_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use envelope::{
    CheckedResponse, ErrorMessage, check_body, check_response, check_status, repair_json_encoding,
};
pub use error::BustimeError;
pub use types::{BusPrediction, Direction, Route, RtpiDataFeed};
