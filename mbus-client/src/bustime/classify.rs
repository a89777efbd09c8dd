//! Classification of upstream error messages.
//!
//! Upstream error messages are free text, often with extra detail appended, so
//! classification is by case-sensitive substring containment rather than
//! exact match.

use std::fmt;

/// The kind of a domain error reported in a `bustime-response` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// A request parameter (route, stop, direction) matched nothing.
    ParameterNotFound,
    /// The endpoint requires `rtpidatafeed` on a multi-feed site.
    NoDataFeed,
    /// The `rtpidatafeed` value is not a known feed.
    InvalidDataFeed,
    /// The selected feed does not support the endpoint.
    UnsupportedDataFeed,
    /// No known phrase matched; the raw message is all there is.
    Unclassified,
}

impl ApiErrorKind {
    /// Classify a message, falling back to [`ApiErrorKind::Unclassified`].
    pub fn from_message(message: &str) -> Self {
        classify(message).unwrap_or(ApiErrorKind::Unclassified)
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApiErrorKind::ParameterNotFound => "no data found for parameter",
            ApiErrorKind::NoDataFeed => "no RTPI data feed parameter provided",
            ApiErrorKind::InvalidDataFeed => "invalid RTPI data feed parameter",
            ApiErrorKind::UnsupportedDataFeed => "the rtpidatafeed does not support this function",
            ApiErrorKind::Unclassified => "got bustime error",
        };
        f.write_str(s)
    }
}

/// Known message fragments, in the casing the upstream service sends them.
const FRAGMENTS: &[(&str, ApiErrorKind)] = &[
    ("No data found for parameter", ApiErrorKind::ParameterNotFound),
    ("No RTPI Data Feed parameter provided", ApiErrorKind::NoDataFeed),
    ("Invalid RTPI Data Feed parameter", ApiErrorKind::InvalidDataFeed),
    (
        "The rtpidatafeed does not support this function",
        ApiErrorKind::UnsupportedDataFeed,
    ),
];

/// Messages that mean "nothing to report" on the predictions endpoint.
pub const EMPTY_RESULT_MESSAGES: &[&str] = &["No arrival times", "No service scheduled"];

/// Map an upstream error message to a known error kind.
///
/// Returns `None` when no known fragment occurs in `message`. If several
/// fragments occur, the longest one decides; equal lengths fall back to
/// table order.
pub fn classify(message: &str) -> Option<ApiErrorKind> {
    let mut best: Option<(usize, ApiErrorKind)> = None;

    for &(fragment, kind) in FRAGMENTS {
        if !message.contains(fragment) {
            continue;
        }
        if best.is_none_or(|(len, _)| fragment.len() > len) {
            best = Some((fragment.len(), kind));
        }
    }

    best.map(|(_, kind)| kind)
}

/// Whether `message` is exactly one of `any_of`.
pub fn message_is(message: &str, any_of: &[&str]) -> bool {
    any_of.contains(&message)
}

/// Whether `message` is a predictions "no data" message rather than an error.
pub fn is_empty_result(message: &str) -> bool {
    message_is(message, EMPTY_RESULT_MESSAGES)
}
