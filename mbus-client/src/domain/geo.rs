//! Great-circle distance and distance-based stop selection.

use std::f64::consts::PI;

use super::stop::{NearbyStop, Stop};

/// Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_100.0;

/// Error returned when no stop lies within the requested distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no close stop found")]
pub struct NoCloseStop;

/// Haversine of an angle in radians: `sin²(θ/2)`.
fn hav(theta: f64) -> f64 {
    (theta / 2.0).sin().powi(2)
}

/// Great-circle distance in meters between two points given in degrees.
///
/// Uses the haversine formula on a sphere of radius [`EARTH_RADIUS_M`].
///
/// # Examples
///
/// ```
/// use mbus_client::domain::gps_distance;
///
/// assert_eq!(gps_distance(42.28, -83.74, 42.28, -83.74), 0.0);
/// ```
pub fn gps_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let la1 = lat1 * PI / 180.0;
    let lo1 = lon1 * PI / 180.0;
    let la2 = lat2 * PI / 180.0;
    let lo2 = lon2 * PI / 180.0;

    let h = hav(la2 - la1) + la1.cos() * la2.cos() * hav(lo2 - lo1);

    // Rounding can push h just past 1 for near-antipodal points.
    2.0 * EARTH_RADIUS_M * h.min(1.0).sqrt().asin()
}

/// Sort stops in place by distance from `(lat, lon)`, nearest first.
///
/// The sort is stable: stops at equal distance keep their relative order.
pub fn sort_stops_by_distance(stops: &mut [Stop], lat: f64, lon: f64) {
    stops.sort_by(|a, b| {
        let da = gps_distance(a.latitude, a.longitude, lat, lon);
        let db = gps_distance(b.latitude, b.longitude, lat, lon);
        da.total_cmp(&db)
    });
}

/// Pick the nearest stop, provided it is within `threshold` meters.
///
/// Distances are taken as reported by the upstream service. On a tie for
/// the minimum distance the earliest stop in `stops` wins.
pub fn closest_stop(stops: &[NearbyStop], threshold: f64) -> Result<&NearbyStop, NoCloseStop> {
    let mut closest: Option<&NearbyStop> = None;

    for stop in stops {
        if stop.distance.is_nan() {
            continue;
        }
        if closest.is_none_or(|best| stop.distance < best.distance) {
            closest = Some(stop);
        }
    }

    closest
        .filter(|stop| stop.distance <= threshold)
        .ok_or(NoCloseStop)
}
