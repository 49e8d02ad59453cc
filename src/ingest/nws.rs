/// NWS (National Weather Service) Gridpoint API Client
///
/// Retrieves raw gridded forecast layers from the api.weather.gov
/// gridpoints endpoint. Each layer is a sparse series of interval-keyed
/// values in the provider's native units (mm, degC, km/h, percent); the
/// pipeline does all normalization.
///
/// API documentation: https://www.weather.gov/documentation/services-web-api
/// Endpoint shape: https://api.weather.gov/gridpoints/{office}/{x},{y}

use crate::ingest::cache::{GridCache, DEFAULT_TTL};
use crate::logging::{self, DataSource};
use crate::model::{ForecastError, RawSeriesEntry};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const NWS_BASE_URL: &str = "https://api.weather.gov";
const USER_AGENT: &str = "powder_service/0.1 (powder-service forecast builder)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Grid identification
// ============================================================================

/// Identifies one upstream forecast grid: an office code plus grid
/// coordinates. Opaque to the pipeline beyond serving as a cache key and
/// fetch parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridKey {
    pub office: String,
    pub x: u32,
    pub y: u32,
}

impl GridKey {
    pub fn new(office: &str, x: u32, y: u32) -> GridKey {
        GridKey {
            office: office.to_string(),
            x,
            y,
        }
    }

    /// Cache key, e.g. `weather-grid:PDT:23,39`.
    pub fn cache_key(&self) -> String {
        format!("weather-grid:{}:{},{}", self.office, self.x, self.y)
    }

    /// Gridpoint endpoint URL for this key.
    pub fn url(&self) -> String {
        format!(
            "{}/gridpoints/{}/{},{}",
            NWS_BASE_URL, self.office, self.x, self.y
        )
    }
}

// ============================================================================
// NWS API Response Structures
// ============================================================================

/// One gridded quantity: unit code plus interval-keyed values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuantityLayer {
    /// WMO unit code, e.g. "wmoUnit:mm". Informational; conversions are
    /// keyed by quantity, not by this field.
    pub uom: Option<String>,
    #[serde(default)]
    pub values: Vec<RawSeriesEntry>,
}

/// The gridpoint layers this service consumes. The raw response carries
/// dozens more; unknown fields are ignored, absent layers default empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridpointProperties {
    pub snowfall_amount: QuantityLayer,
    pub quantitative_precipitation: QuantityLayer,
    pub probability_of_precipitation: QuantityLayer,
    pub temperature: QuantityLayer,
    pub wind_speed: QuantityLayer,
    pub wind_gust: QuantityLayer,
    pub sky_cover: QuantityLayer,
}

/// Raw gridpoint response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GridpointResponse {
    pub properties: GridpointProperties,
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Build the blocking HTTP client used against the NWS API. The API
/// rejects requests without a User-Agent.
pub fn default_client() -> Result<reqwest::blocking::Client, ForecastError> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ForecastError::Config(format!("cannot build HTTP client: {}", e)))
}

/// Fetch the raw gridpoint JSON for a grid key.
pub fn fetch_gridpoint_raw(
    client: &reqwest::blocking::Client,
    key: &GridKey,
) -> Result<Value, ForecastError> {
    let response = client
        .get(key.url())
        .header("Accept", "application/geo+json")
        .send()
        .map_err(|e| ForecastError::Parse(format!("request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(ForecastError::Http(response.status().as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| ForecastError::Parse(format!("cannot read gridpoint body: {}", e)))?;
    parse_gridpoint_body(&body)
}

/// Parses a raw gridpoint response body as JSON.
pub fn parse_gridpoint_body(body: &str) -> Result<Value, ForecastError> {
    serde_json::from_str(body)
        .map_err(|e| ForecastError::Parse(format!("bad gridpoint body: {}", e)))
}

/// Decode a raw gridpoint document into the typed layers.
pub fn decode_gridpoint(raw: Value) -> Result<GridpointResponse, ForecastError> {
    serde_json::from_value(raw)
        .map_err(|e| ForecastError::Parse(format!("bad gridpoint shape: {}", e)))
}

/// Fetch and decode the gridpoint layers for a grid key.
pub fn fetch_gridpoint(
    client: &reqwest::blocking::Client,
    key: &GridKey,
) -> Result<GridpointResponse, ForecastError> {
    fetch_gridpoint_raw(client, key).and_then(decode_gridpoint)
}

/// Cache-aware fetch: serve from the injected cache when a fresh entry
/// exists, otherwise fetch live and populate the cache with the default
/// TTL. A cached document that no longer decodes is discarded in favor
/// of a live fetch.
pub fn fetch_gridpoint_cached(
    client: &reqwest::blocking::Client,
    cache: &dyn GridCache,
    key: &GridKey,
) -> Result<GridpointResponse, ForecastError> {
    let cache_key = key.cache_key();

    if let Some(cached) = cache.get(&cache_key) {
        match decode_gridpoint(cached) {
            Ok(response) => {
                logging::debug(DataSource::Cache, Some(&cache_key), "cache hit");
                return Ok(response);
            }
            Err(e) => {
                logging::warn(
                    DataSource::Cache,
                    Some(&cache_key),
                    &format!("discarding undecodable cache entry: {}", e),
                );
            }
        }
    }

    let raw = fetch_gridpoint_raw(client, key)?;
    cache.set(&cache_key, &raw, DEFAULT_TTL);
    decode_gridpoint(raw)
}
