/// Threshold configuration for signal derivation and segment building.
///
/// Every threshold has a defined default; a TOML document may override any
/// subset and the rest keep their defaults. Validation failures are the
/// one hard error in this crate (`ForecastError::Config`) — reported
/// distinctly from "no data".

use crate::model::ForecastError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Sky cover (%) below which a slot can count as favorable.
pub const DEFAULT_FAVORABLE_CLOUD_CEILING: f64 = 30.0;

/// Liquid-equivalent inches a slot must exceed before precipitation is
/// considered meaningful (filters trace / instrument-noise amounts).
pub const DEFAULT_PRECIP_RISK_MIN_IN: f64 = 0.02;

/// Minimum precipitation probability (%) for a precip-risk flag.
pub const DEFAULT_PRECIP_RISK_MIN_PROBABILITY: f64 = 10.0;

/// Wind speed (mph) above which a slot carries a wind-risk flag.
pub const DEFAULT_WIND_RISK_MPH: f64 = 20.0;

/// Ceiling on a single warning segment's span, in hours.
pub const DEFAULT_MAX_WARNING_SPAN_HOURS: i64 = 24;

/// Largest accepted warning span: one year. Keeps the millisecond
/// conversion comfortably inside `i64`.
pub const MAX_WARNING_SPAN_HOURS: i64 = 24 * 366;

// ---------------------------------------------------------------------------
// Configuration bundle
// ---------------------------------------------------------------------------

/// Thresholds consumed by `analysis::signals` and `alert::segments`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    pub favorable_cloud_ceiling: f64,
    pub precip_risk_min_in: f64,
    pub precip_risk_min_probability: f64,
    pub wind_risk_mph: f64,
    pub max_warning_span_hours: i64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            favorable_cloud_ceiling: DEFAULT_FAVORABLE_CLOUD_CEILING,
            precip_risk_min_in: DEFAULT_PRECIP_RISK_MIN_IN,
            precip_risk_min_probability: DEFAULT_PRECIP_RISK_MIN_PROBABILITY,
            wind_risk_mph: DEFAULT_WIND_RISK_MPH,
            max_warning_span_hours: DEFAULT_MAX_WARNING_SPAN_HOURS,
        }
    }
}

impl ForecastConfig {
    /// Parses a TOML document, keeping defaults for any omitted field.
    pub fn from_toml_str(document: &str) -> Result<ForecastConfig, ForecastError> {
        let config: ForecastConfig = toml::from_str(document)
            .map_err(|e| ForecastError::Config(format!("invalid config TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<ForecastConfig, ForecastError> {
        let document = fs::read_to_string(path).map_err(|e| {
            ForecastError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        ForecastConfig::from_toml_str(&document)
    }

    /// Rejects structurally invalid threshold bundles.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.max_warning_span_hours <= 0 || self.max_warning_span_hours > MAX_WARNING_SPAN_HOURS {
            return Err(ForecastError::Config(format!(
                "max_warning_span_hours must be in 1..={}, got {}",
                MAX_WARNING_SPAN_HOURS, self.max_warning_span_hours
            )));
        }
        for (name, value) in [
            ("favorable_cloud_ceiling", self.favorable_cloud_ceiling),
            ("precip_risk_min_in", self.precip_risk_min_in),
            ("precip_risk_min_probability", self.precip_risk_min_probability),
            ("wind_risk_mph", self.wind_risk_mph),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ForecastError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Maximum warning-segment span in milliseconds, the unit the segment
    /// builder compares slot times in.
    pub fn max_warning_span_ms(&self) -> i64 {
        self.max_warning_span_hours * 60 * 60 * 1000
    }
}
