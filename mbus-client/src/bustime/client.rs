//! BusTime HTTP client.
//!
//! Builds per-endpoint requests, signs them, and runs the responses through
//! envelope validation and error classification.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::try_join_all;
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::{AuthScheme, Signer};
use crate::domain::{NearbyStop, Stop, closest_stop, deduplicate_stops};

use super::classify::is_empty_result;
use super::config::BustimeConfig;
use super::envelope::{CheckedResponse, check_response, check_status};
use super::error::BustimeError;
use super::types::{
    BusPrediction, DataFeedsPayload, Direction, DirectionsPayload, Envelope, NearbyStopsResponse,
    PredictionsPayload, Route, RoutesPayload, RtpiDataFeed, StopsPayload,
};

/// Search radius for nearby stops, in miles.
const NEARBY_RADIUS: &str = "0.5";

/// Maximum number of nearby stops requested.
const NEARBY_MAX: &str = "10";

type Params = Vec<(&'static str, String)>;

/// BusTime API client.
///
/// Cheap to clone; clones share the selected data feed.
#[derive(Debug, Clone)]
pub struct BustimeClient {
    http: reqwest::Client,
    base_url: String,
    nearby_base_url: String,
    signer: Signer,
    data_feed: Arc<RwLock<Option<String>>>,
}

impl BustimeClient {
    /// Create a new BusTime client with the given configuration.
    pub fn new(config: BustimeConfig) -> Result<Self, BustimeError> {
        let base_url = normalize_base_url(&config.base_url)?;
        let nearby_base_url = normalize_base_url(&config.nearby_base_url)?;

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url,
            nearby_base_url,
            signer: Signer::new(config.credentials, config.auth),
            data_feed: Arc::new(RwLock::new(config.data_feed)),
        })
    }

    /// The currently selected data feed, if any.
    pub async fn data_feed(&self) -> Option<String> {
        self.data_feed.read().await.clone()
    }

    /// Select a data feed (or clear the selection with `None`).
    pub async fn set_data_feed(&self, feed: Option<String>) {
        *self.data_feed.write().await = feed;
    }

    /// Get all routes.
    pub async fn get_routes(&self) -> Result<Vec<Route>, BustimeError> {
        let mut params = self.feed_params().await;
        params.push(("locale", "en".to_string()));

        let payload: RoutesPayload = self.get_v3("/getroutes", params).await?;
        Ok(payload.routes)
    }

    /// Get the directions of travel for a route.
    pub async fn get_directions(&self, route_id: &str) -> Result<Vec<Direction>, BustimeError> {
        let mut params = vec![("rt", route_id.to_string())];
        params.extend(self.feed_params().await);
        params.push(("locale", "en".to_string()));

        let payload: DirectionsPayload = self.get_v3("/getdirections", params).await?;
        Ok(payload.directions)
    }

    /// Get the stops of a route in one direction.
    pub async fn get_stops_in_direction(
        &self,
        route_id: &str,
        direction_id: &str,
    ) -> Result<Vec<Stop>, BustimeError> {
        let mut params = vec![
            ("rt", route_id.to_string()),
            ("dir", direction_id.to_string()),
        ];
        params.extend(self.feed_params().await);
        params.push(("locale", "en".to_string()));

        let payload: StopsPayload = self.get_v3("/getstops", params).await?;
        Ok(payload.stops)
    }

    /// Get every stop on a route, across all of its directions.
    ///
    /// Directions are fetched concurrently and the merged list is
    /// deduplicated by stop ID. Fails if any direction fails.
    pub async fn get_stops(&self, route_id: &str) -> Result<Vec<Stop>, BustimeError> {
        let directions = self.get_directions(route_id).await?;

        let per_direction = try_join_all(
            directions
                .iter()
                .map(|d| self.get_stops_in_direction(route_id, &d.id)),
        )
        .await?;

        let total: usize = per_direction.iter().map(Vec::len).sum();
        let stops = deduplicate_stops(per_direction.into_iter().flatten());
        debug!(
            route = route_id,
            directions = directions.len(),
            total,
            unique = stops.len(),
            "merged route stops"
        );

        Ok(stops)
    }

    /// Get arrival/departure predictions for a stop.
    ///
    /// `route_ids` restricts the predictions to those routes. "No arrival
    /// times" and "No service scheduled" produce an empty list rather than
    /// an error.
    pub async fn get_stop_predictions(
        &self,
        stop_id: &str,
        route_ids: Option<&[&str]>,
    ) -> Result<Vec<BusPrediction>, BustimeError> {
        let mut params = vec![
            ("stpid", stop_id.to_string()),
            ("locale", "en".to_string()),
            ("tmres", "s".to_string()),
        ];
        if let Some(route_ids) = route_ids {
            params.push(("rt", route_ids.join(",")));
        }

        let checked = self.fetch_v3("/getpredictions", params).await?;
        if let Some(message) = checked.first_error() {
            if is_empty_result(message) {
                debug!(stop = stop_id, upstream = message, "no predictions");
                return Ok(Vec::new());
            }
            return Err(checked.into_error());
        }

        let envelope: Envelope<PredictionsPayload> = checked.decode()?;
        Ok(envelope.wrapper.predictions)
    }

    /// List the available real-time data feeds.
    pub async fn get_rtpi_data_feeds(&self) -> Result<Vec<RtpiDataFeed>, BustimeError> {
        let payload: DataFeedsPayload = self.get_v3("/getrtpidatafeeds", Vec::new()).await?;
        Ok(payload.feeds)
    }

    /// Select the first enabled data feed.
    ///
    /// Clears the selection if no feed is enabled. Returns the new selection.
    pub async fn auto_configure_data_feed(&self) -> Result<Option<String>, BustimeError> {
        let feeds = self.get_rtpi_data_feeds().await?;
        let selected = feeds.into_iter().find(|f| f.enabled).map(|f| f.name);

        debug!(feed = ?selected, "auto-configured data feed");
        self.set_data_feed(selected.clone()).await;
        Ok(selected)
    }

    /// Find stops near a point, with distances computed by the upstream.
    ///
    /// Uses the v2 endpoint, which is always signed with
    /// [`AuthScheme::LegacySigned`] and has no error envelope; only the
    /// status code is checked.
    pub async fn get_nearby_stops(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<NearbyStop>, BustimeError> {
        let url = format!("{}/stops/nearby", self.nearby_base_url);
        let params: Params = vec![
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("rad", NEARBY_RADIUS.to_string()),
            ("max", NEARBY_MAX.to_string()),
        ];

        let signer = self.signer.with_scheme(AuthScheme::LegacySigned);
        let response = self.send(&url, &params, &signer).await?;
        check_status(response.status())?;

        let body = response.bytes().await?;
        let parsed: NearbyStopsResponse =
            serde_json::from_slice(&body).map_err(|e| BustimeError::malformed(&e, &body))?;

        Ok(parsed.data.stops)
    }

    /// The nearest stop to a point, if one is within `threshold` meters.
    pub async fn get_closest_stop(
        &self,
        latitude: f64,
        longitude: f64,
        threshold: f64,
    ) -> Result<NearbyStop, BustimeError> {
        let stops = self.get_nearby_stops(latitude, longitude).await?;
        let closest = closest_stop(&stops, threshold)?;
        Ok(closest.clone())
    }

    /// Query parameters selecting the current data feed, if any.
    async fn feed_params(&self) -> Params {
        match self.data_feed().await {
            Some(feed) => vec![("rtpidatafeed", feed)],
            None => Vec::new(),
        }
    }

    /// Fetch a v3 endpoint and decode its payload, failing on envelope errors.
    async fn get_v3<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Params,
    ) -> Result<T, BustimeError> {
        let checked = self.fetch_v3(endpoint, params).await?;
        if !checked.is_ok() {
            return Err(checked.into_error());
        }

        let envelope: Envelope<T> = checked.decode()?;
        Ok(envelope.wrapper)
    }

    /// Fetch a v3 endpoint and validate its envelope.
    async fn fetch_v3(
        &self,
        endpoint: &str,
        mut params: Params,
    ) -> Result<CheckedResponse, BustimeError> {
        let url = format!("{}{}", self.base_url, endpoint);
        params.push(("format", "json".to_string()));

        let response = self.send(&url, &params, &self.signer).await?;
        check_response(response).await
    }

    /// Build, sign and send a GET request.
    async fn send(
        &self,
        url: &str,
        params: &[(&'static str, String)],
        signer: &Signer,
    ) -> Result<reqwest::Response, BustimeError> {
        let mut request = self
            .http
            .get(url)
            .query(params)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .build()?;

        signer.sign(&mut request, Utc::now())?;

        let response = self.http.execute(request).await?;
        debug!(url, status = response.status().as_u16(), "bustime response");
        Ok(response)
    }
}

/// Validate a base URL and strip any trailing slash.
fn normalize_base_url(url: &str) -> Result<String, BustimeError> {
    Url::parse(url).map_err(|e| BustimeError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    Ok(url.trim_end_matches('/').to_string())
}
