//! Endpoint interface.
//!
//! [`BusApi`] lets callers swap the HTTP client for test data.

use async_trait::async_trait;

use crate::domain::{NearbyStop, Stop};

use super::client::BustimeClient;
use super::error::BustimeError;
use super::types::{BusPrediction, Direction, Route, RtpiDataFeed};

/// The BusTime endpoints.
///
/// See [`BustimeClient`] for the behaviour of each call.
#[async_trait]
pub trait BusApi: Send + Sync {
    async fn get_routes(&self) -> Result<Vec<Route>, BustimeError>;

    async fn get_directions(&self, route_id: &str) -> Result<Vec<Direction>, BustimeError>;

    async fn get_stops_in_direction(
        &self,
        route_id: &str,
        direction_id: &str,
    ) -> Result<Vec<Stop>, BustimeError>;

    /// Every stop on a route, deduplicated across directions.
    async fn get_stops(&self, route_id: &str) -> Result<Vec<Stop>, BustimeError>;

    async fn get_stop_predictions(
        &self,
        stop_id: &str,
        route_ids: Option<&[&str]>,
    ) -> Result<Vec<BusPrediction>, BustimeError>;

    async fn get_rtpi_data_feeds(&self) -> Result<Vec<RtpiDataFeed>, BustimeError>;

    /// Select the first enabled data feed and return the selection.
    async fn auto_configure_data_feed(&self) -> Result<Option<String>, BustimeError>;

    async fn get_nearby_stops(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<NearbyStop>, BustimeError>;

    async fn get_closest_stop(
        &self,
        latitude: f64,
        longitude: f64,
        threshold: f64,
    ) -> Result<NearbyStop, BustimeError>;
}

#[async_trait]
impl BusApi for BustimeClient {
    async fn get_routes(&self) -> Result<Vec<Route>, BustimeError> {
        BustimeClient::get_routes(self).await
    }

    async fn get_directions(&self, route_id: &str) -> Result<Vec<Direction>, BustimeError> {
        BustimeClient::get_directions(self, route_id).await
    }

    async fn get_stops_in_direction(
        &self,
        route_id: &str,
        direction_id: &str,
    ) -> Result<Vec<Stop>, BustimeError> {
        BustimeClient::get_stops_in_direction(self, route_id, direction_id).await
    }

    async fn get_stops(&self, route_id: &str) -> Result<Vec<Stop>, BustimeError> {
        BustimeClient::get_stops(self, route_id).await
    }

    async fn get_stop_predictions(
        &self,
        stop_id: &str,
        route_ids: Option<&[&str]>,
    ) -> Result<Vec<BusPrediction>, BustimeError> {
        BustimeClient::get_stop_predictions(self, stop_id, route_ids).await
    }

    async fn get_rtpi_data_feeds(&self) -> Result<Vec<RtpiDataFeed>, BustimeError> {
        BustimeClient::get_rtpi_data_feeds(self).await
    }

    async fn auto_configure_data_feed(&self) -> Result<Option<String>, BustimeError> {
        BustimeClient::auto_configure_data_feed(self).await
    }

    async fn get_nearby_stops(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<NearbyStop>, BustimeError> {
        BustimeClient::get_nearby_stops(self, latitude, longitude).await
    }

    async fn get_closest_stop(
        &self,
        latitude: f64,
        longitude: f64,
        threshold: f64,
    ) -> Result<NearbyStop, BustimeError> {
        BustimeClient::get_closest_stop(self, latitude, longitude, threshold).await
    }
}
