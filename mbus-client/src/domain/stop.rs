//! Stop types and stop-list merging.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A bus stop served by a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Stop identifier. Unique per stop; compared by exact string equality.
    #[serde(rename = "stpid")]
    pub id: String,

    /// Display name.
    #[serde(rename = "stpnm", default)]
    pub name: String,

    /// Latitude in degrees.
    #[serde(rename = "lat", default)]
    pub latitude: f64,

    /// Longitude in degrees.
    #[serde(rename = "lon", default)]
    pub longitude: f64,
}

/// A stop returned by the nearby-stops endpoint.
///
/// The distance is computed by the upstream service, not locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyStop {
    /// Distance from the query point in meters.
    ///
    /// Infinite when the upstream omits it, so such a stop is never chosen
    /// as the closest.
    #[serde(rename = "dist", default = "unknown_distance")]
    pub distance: f64,

    /// Stop identifier.
    #[serde(rename = "stpid")]
    pub id: String,
}

fn unknown_distance() -> f64 {
    f64::INFINITY
}

/// Merge stop lists into a set unique by stop ID.
///
/// The first occurrence of each ID wins; later stops with the same ID are
/// dropped even if their other fields differ. Callers must not rely on the
/// order of the result.
pub fn deduplicate_stops(stops: impl IntoIterator<Item = Stop>) -> Vec<Stop> {
    let mut seen = HashSet::new();
    stops
        .into_iter()
        .filter(|stop| seen.insert(stop.id.clone()))
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// Stops drawn from a small ID space so duplicates are common
    fn stops_strategy() -> impl Strategy<Value = Vec<Stop>> {
        prop::collection::vec(
            ("[A-E]", "[a-z]{1,6}", -90.0f64..90.0, -180.0f64..180.0).prop_map(
                |(id, name, latitude, longitude)| Stop {
                    id,
                    name,
                    latitude,
                    longitude,
                },
            ),
            0..30,
        )
    }

    proptest! {
        /// Output size equals the number of distinct IDs
        #[test]
        fn size_is_distinct_count(stops in stops_strategy()) {
            let distinct: HashSet<_> = stops.iter().map(|s| s.id.clone()).collect();
            let result = deduplicate_stops(stops);
            prop_assert_eq!(result.len(), distinct.len());
        }

        /// Each output entry equals the first input entry with its ID
        #[test]
        fn entries_match_first_occurrence(stops in stops_strategy()) {
            let mut first: HashMap<String, Stop> = HashMap::new();
            for s in &stops {
                first.entry(s.id.clone()).or_insert_with(|| s.clone());
            }

            let result = deduplicate_stops(stops);
            for s in &result {
                prop_assert_eq!(Some(s), first.get(&s.id));
            }
        }
    }
}
