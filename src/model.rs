/// Core data types for the powder forecast service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic, no I/O, and no external dependencies beyond chrono
/// and serde — only types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Gridpoint quantity names
// ---------------------------------------------------------------------------

/// NWS gridpoint layer name for snowfall amount, in millimeters.
pub const QTY_SNOWFALL: &str = "snowfallAmount";

/// NWS gridpoint layer name for liquid-equivalent precipitation, in millimeters.
pub const QTY_PRECIP: &str = "quantitativePrecipitation";

/// NWS gridpoint layer name for precipitation probability, in percent.
pub const QTY_PRECIP_PROBABILITY: &str = "probabilityOfPrecipitation";

/// NWS gridpoint layer name for ambient temperature, in degrees Celsius.
pub const QTY_TEMPERATURE: &str = "temperature";

/// NWS gridpoint layer name for sustained wind speed, in km/h.
pub const QTY_WIND_SPEED: &str = "windSpeed";

/// NWS gridpoint layer name for wind gust speed, in km/h.
pub const QTY_WIND_GUST: &str = "windGust";

/// NWS gridpoint layer name for sky cover, in percent.
pub const QTY_SKY_COVER: &str = "skyCover";

// ---------------------------------------------------------------------------
// Raw series types
// ---------------------------------------------------------------------------

/// A raw gridpoint value as it arrives off the wire: a JSON number, a
/// free-text string (sometimes a range like "40-60"), or null.
///
/// This union must not propagate past the unit converters in `units` —
/// everything downstream of them works with strict `Option<f64>` / `f64`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Missing,
}

impl RawValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }

    fn missing() -> RawValue {
        RawValue::Missing
    }
}

/// One entry of a raw gridpoint series for a single quantity.
///
/// Corresponds to one element of a `properties.<quantity>.values[]` array
/// in an NWS gridpoint response. `valid_time` is an ISO 8601 interval
/// string in one of three shapes: a bare timestamp, `start/duration`, or
/// `start/end`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeriesEntry {
    pub valid_time: String,
    #[serde(default = "RawValue::missing")]
    pub value: RawValue,
}

/// A concrete time range decoded from an interval string.
///
/// `end >= start` always; `end == start` marks a point sample. Never
/// mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Forecast point types
// ---------------------------------------------------------------------------

/// Precipitation phase classification for one slot. Exactly one value per
/// slot — a slot is never both snow and rain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecipitationType {
    Snow,
    Rain,
    None,
}

/// Warning kinds tracked by the segment builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    Precip,
    Wind,
}

/// The canonical unit of the output timeline: one reconciled slot with
/// unit-normalized quantities and derived signals.
///
/// Exactly one `ForecastPoint` exists per distinct slot; the sequence is
/// strictly ordered by `time` ascending with no duplicates. Points are
/// created once by the pipeline and never mutated afterward — consumers
/// derive view-specific fields without touching the canonical record.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    /// Slot start time; always equal to `start_time`.
    pub time: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    /// The next slot's start time, or `time` for the final slot.
    pub end_time: DateTime<Utc>,
    /// Snowfall depth in inches. Amounts default to zero, distinct from
    /// "unknown".
    pub inches: f64,
    /// Liquid-equivalent precipitation in inches.
    pub precip_inches: f64,
    /// 0–100, or None when the layer had no data near this slot.
    pub precip_probability: Option<f64>,
    pub temperature_f: Option<f64>,
    pub wind_mph: Option<f64>,
    pub wind_gust_mph: Option<f64>,
    /// Sky cover percent, 0–100.
    pub cloud_cover: Option<f64>,
    pub precipitation_type: PrecipitationType,
    /// The "bluebird" flag: low cloud cover and no meaningful precipitation.
    pub is_favorable: bool,
    /// Active per-slot risk kind, precip taking precedence over wind.
    pub alert: Option<WarningKind>,
}

// ---------------------------------------------------------------------------
// Warning segment types
// ---------------------------------------------------------------------------

/// Kind-specific aggregates for one warning segment, computed only over
/// the slots that were actually active for the segment's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentStats {
    Precip {
        /// Mean precipitation probability over slots that reported one.
        average_probability: Option<f64>,
        /// Total liquid-equivalent precipitation over active slots.
        total_precip_in: f64,
    },
    Wind {
        /// Mean sustained wind over slots that reported one.
        average_mph: Option<f64>,
        /// Highest gust over active slots.
        peak_mph: Option<f64>,
    },
}

/// A contiguous run of risk-flagged slots, merged and summarized for
/// presentation. `start_index <= end_index`; both index into the
/// `ForecastPoint` sequence the segment was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct WarningSegment {
    pub kind: WarningKind,
    pub start_index: usize,
    pub end_index: usize,
    pub start_label: String,
    pub end_label: String,
    pub start_time_ms: i64,
    pub end_time_ms: i64,
    pub stats: SegmentStats,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or processing gridpoint data.
///
/// The pipeline itself never fails on a malformed data point — bad entries
/// degrade to nulls or zero amounts. These errors come from the external
/// boundary (fetch, decode) and from structurally invalid configuration,
/// which is reported distinctly from "no data".
#[derive(Debug, PartialEq)]
pub enum ForecastError {
    /// Non-2xx HTTP response from the NWS API.
    Http(u16),
    /// A response body or raw field could not be parsed.
    Parse(String),
    /// The configuration bundle is structurally invalid.
    Config(String),
    /// The response carried no usable gridpoint layers.
    NoData(String),
}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastError::Http(code) => write!(f, "HTTP error: {}", code),
            ForecastError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ForecastError::Config(msg) => write!(f, "Config error: {}", msg),
            ForecastError::NoData(what) => write!(f, "No data available: {}", what),
        }
    }
}

impl std::error::Error for ForecastError {}
