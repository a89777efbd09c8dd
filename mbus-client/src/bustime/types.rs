//! BusTime API response DTOs.
//!
//! These types map directly to the BusTime JSON responses. Payload lists
//! default to empty when the upstream omits them.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::domain::{NearbyStop, Stop};

/// A direction of travel on a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    /// Direction identifier, passed back as `dir` to `getstops`.
    pub id: String,

    /// Human-readable direction name.
    #[serde(default)]
    pub name: String,
}

/// A route served by the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "rt")]
    pub id: String,

    #[serde(rename = "rtnm", default)]
    pub name: String,

    /// Route color as `#RRGGBB`.
    #[serde(rename = "rtclr", default)]
    pub color: String,

    /// Route designator for display.
    #[serde(rename = "rtdd", default)]
    pub display: String,
}

/// An arrival or departure prediction for a stop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusPrediction {
    #[serde(rename = "stpnm")]
    pub stop_name: String,

    #[serde(rename = "stpid")]
    pub stop_id: String,

    /// `"A"` for an arrival, `"D"` for a departure.
    #[serde(rename = "typ")]
    pub prediction_type: String,

    #[serde(rename = "vid")]
    pub vehicle_id: String,

    #[serde(rename = "rt")]
    pub route_id: String,

    #[serde(rename = "rtdd")]
    pub route_display: String,

    #[serde(rename = "rtdir")]
    pub route_direction: String,

    #[serde(rename = "des")]
    pub final_destination: String,

    /// Predicted time, formatted like `20211226 13:22` (or with seconds
    /// when requested with `tmres=s`).
    #[serde(rename = "prdtm")]
    pub predicted_arrival: String,

    #[serde(rename = "dly")]
    pub delayed: bool,

    #[serde(rename = "dyn")]
    pub dynamic_action_mode: i32,

    /// Minutes until arrival, or text such as `"DUE"`.
    #[serde(rename = "prdctdn")]
    pub prediction_countdown: String,
}

impl BusPrediction {
    /// Whether this is an arrival prediction.
    pub fn is_arrival(&self) -> bool {
        self.prediction_type == "A"
    }

    /// Whether this is a departure prediction.
    pub fn is_departure(&self) -> bool {
        self.prediction_type == "D"
    }
}

/// A real-time passenger information data feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtpiDataFeed {
    /// Feed name, passed back as `rtpidatafeed`.
    pub name: String,

    #[serde(default)]
    pub source: String,

    #[serde(rename = "displayname", default)]
    pub display_name: String,

    #[serde(deserialize_with = "string_bool", default)]
    pub enabled: bool,

    #[serde(deserialize_with = "string_bool", default)]
    pub visible: bool,
}

/// Decode a boolean the upstream sends as a string (`"true"`, `"False"`).
///
/// Case-insensitive; JSON booleans are accepted too.
fn string_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringBoolVisitor;

    impl Visitor<'_> for StringBoolVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a boolean or the string \"true\" or \"false\"")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            if v.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if v.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }
    }

    deserializer.deserialize_any(StringBoolVisitor)
}

/// The `bustime-response` wrapper around an endpoint payload.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(rename = "bustime-response")]
    pub wrapper: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoutesPayload {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsPayload {
    #[serde(default)]
    pub directions: Vec<Direction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StopsPayload {
    #[serde(default)]
    pub stops: Vec<Stop>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictionsPayload {
    #[serde(rename = "prd", default)]
    pub predictions: Vec<BusPrediction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DataFeedsPayload {
    #[serde(rename = "rtpidatafeeds", default)]
    pub feeds: Vec<RtpiDataFeed>,
}

/// Response from the v2 nearby-stops endpoint: `{"data": {"stops": [...]}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct NearbyStopsResponse {
    pub data: NearbyStopsData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NearbyStopsData {
    #[serde(default)]
    pub stops: Vec<NearbyStop>,
}
