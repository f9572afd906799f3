///! Upstream flight-state feed client
///!
///! Performs exactly one HTTP call per `fetch` and maps the positional state
///! vectors into classified `FlightRecord`s. Retrying is the scheduler's job.
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use tracker_common::{FlightRecord, UNKNOWN, is_european_country};

use super::classifier::classify;

pub const OPENSKY_STATES_URL: &str = "https://opensky-network.org/api/states/all";
const USER_AGENT: &str = "FlightTracker/1.0 (Educational Purpose)";
const REQUEST_TIMEOUT_SECONDS: u64 = 15;

// Positions inside one state vector
const ICAO24: usize = 0;
const CALLSIGN: usize = 1;
const ORIGIN_COUNTRY: usize = 2;
const LAST_CONTACT: usize = 4;
const LONGITUDE: usize = 5;
const LATITUDE: usize = 6;
const BARO_ALTITUDE: usize = 7;
const VELOCITY: usize = 9;
const TRUE_TRACK: usize = 10;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed rate limited the request (HTTP 429)")]
    Throttled,
    #[error("Feed unreachable: {0}")]
    Unreachable(String),
    #[error("Feed returned error status: {status}")]
    Status { status: StatusCode },
    #[error("Invalid feed payload: {0}")]
    InvalidPayload(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FeedError::InvalidPayload(e.to_string())
        } else {
            FeedError::Unreachable(e.to_string())
        }
    }
}

/// Source of live flight records
#[async_trait]
pub trait FlightFeed: Send + Sync {
    async fn fetch(&self) -> Result<Vec<FlightRecord>, FeedError>;
}

#[async_trait]
impl<T: FlightFeed + ?Sized> FlightFeed for std::sync::Arc<T> {
    async fn fetch(&self) -> Result<Vec<FlightRecord>, FeedError> {
        (**self).fetch().await
    }
}

/// HTTP client for the OpenSky `states/all` endpoint
pub struct FeedClient {
    client: Client,
    url: String,
}

impl FeedClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Self::client_builder(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    fn client_builder(timeout: Duration) -> reqwest::ClientBuilder {
        Client::builder().timeout(timeout).user_agent(USER_AGENT)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FlightFeed for FeedClient {
    async fn fetch(&self) -> Result<Vec<FlightRecord>, FeedError> {
        tracing::debug!("Fetching flight states from {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                parse_states(&body)
            }
            StatusCode::TOO_MANY_REQUESTS => Err(FeedError::Throttled),
            status => Err(FeedError::Status { status }),
        }
    }
}

/// Body of a `states/all` response
#[derive(Debug, Deserialize)]
struct StatesResponse {
    #[allow(dead_code)]
    time: Option<i64>,
    /// `null` when no aircraft matched
    states: Option<Vec<Vec<Value>>>,
}

/// Parse a `states/all` body, keeping only military and private aircraft.
///
/// Feed order is preserved.
pub fn parse_states(json: &str) -> Result<Vec<FlightRecord>, FeedError> {
    let resp: StatesResponse =
        serde_json::from_str(json).map_err(|e| FeedError::InvalidPayload(e.to_string()))?;

    let flights: Vec<FlightRecord> = resp
        .states
        .unwrap_or_default()
        .iter()
        .filter_map(|state| state_to_record(state))
        .collect();

    Ok(flights)
}

fn state_to_record(state: &[Value]) -> Option<FlightRecord> {
    let longitude = number_at(state, LONGITUDE)?;
    let latitude = number_at(state, LATITUDE)?;

    let callsign = state
        .get(CALLSIGN)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(UNKNOWN);
    let category = classify(callsign)?;

    let id = state.get(ICAO24).and_then(Value::as_str)?;
    let origin_country = state
        .get(ORIGIN_COUNTRY)
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN);

    let last_contact = number_at(state, LAST_CONTACT)
        .and_then(|secs| DateTime::from_timestamp(secs as i64, 0));

    Some(FlightRecord {
        id: id.to_string(),
        callsign: callsign.to_string(),
        origin_country: origin_country.to_string(),
        destination_country: None,
        longitude,
        latitude,
        altitude: number_at(state, BARO_ALTITUDE).unwrap_or(0.0),
        velocity: number_at(state, VELOCITY).unwrap_or(0.0),
        heading: number_at(state, TRUE_TRACK).unwrap_or(0.0),
        last_contact,
        is_european: is_european_country(origin_country),
        category,
    })
}

fn number_at(state: &[Value], index: usize) -> Option<f64> {
    state.get(index).and_then(Value::as_f64)
}
