//! Magic Bus (BusTime) API client.
//!
//! A client for the University of Michigan Magic Bus real-time API: request
//! signing, response envelope validation, error classification, and the
//! stop utilities used to post-process multi-call results.

pub mod auth;
pub mod bustime;
pub mod domain;
