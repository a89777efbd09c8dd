//! Domain types for BusTime stop data.
//!
//! Stops, nearby-stop results, and the pure functions that post-process
//! them: great-circle distance, distance ordering, nearest-stop selection
//! and deduplication across direction queries.

mod geo;
mod stop;

pub use geo::{EARTH_RADIUS_M, NoCloseStop, closest_stop, gps_distance, sort_stops_by_distance};
pub use stop::{NearbyStop, Stop, deduplicate_stops};
