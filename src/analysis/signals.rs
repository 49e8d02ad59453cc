/// Per-slot signal derivation.
///
/// Pure threshold rules over the reconciled, unit-normalized quantities.
/// Every threshold comes in through `ForecastConfig` — nothing here is
/// hard-coded beyond the freezing point. Each flag is independent; a slot
/// may carry several simultaneously.

use crate::config::ForecastConfig;
use crate::model::{ForecastPoint, PrecipitationType, WarningKind};

/// Phase boundary for rain-vs-frozen classification, in Fahrenheit.
pub const FREEZING_POINT_F: f64 = 32.0;

// ---------------------------------------------------------------------------
// Precipitation phase
// ---------------------------------------------------------------------------

/// Classifies one slot's precipitation phase. Snow wins whenever the
/// snowfall layer reports depth; rain requires liquid precipitation plus
/// a non-frozen temperature signal. Missing temperature reads as
/// non-frozen — liquid with no evidence of freezing is rain. A slot is
/// never both.
pub fn precipitation_type(
    snow_in: f64,
    precip_in: f64,
    temperature_f: Option<f64>,
) -> PrecipitationType {
    if snow_in > 0.0 {
        return PrecipitationType::Snow;
    }
    let non_frozen = temperature_f.map_or(true, |t| t > FREEZING_POINT_F);
    if precip_in > 0.0 && non_frozen {
        return PrecipitationType::Rain;
    }
    PrecipitationType::None
}

// ---------------------------------------------------------------------------
// Favorable ("bluebird") windows
// ---------------------------------------------------------------------------

/// True only when sky cover is known and strictly below the configured
/// ceiling, and no meaningful liquid-equivalent precipitation is recorded
/// for the slot. Trace amounts at or under `precip_risk_min_in` do not
/// disqualify.
pub fn is_favorable(cloud_cover: Option<f64>, precip_in: f64, config: &ForecastConfig) -> bool {
    let clear_enough = match cloud_cover {
        Some(cover) => cover < config.favorable_cloud_ceiling,
        None => false,
    };
    clear_enough && precip_in <= config.precip_risk_min_in
}

// ---------------------------------------------------------------------------
// Risk flags
// ---------------------------------------------------------------------------

/// Precipitation-risk flag: rain phase, a meaningful amount, and a
/// probability meeting the configured minimum.
///
/// Missing probability is treated as meeting the threshold — the flag
/// fails open toward warning rather than suppressing a warning for lack
/// of probability data. See DESIGN.md before changing this.
pub fn precip_risk(
    phase: PrecipitationType,
    precip_in: f64,
    probability: Option<f64>,
    config: &ForecastConfig,
) -> bool {
    if phase != PrecipitationType::Rain {
        return false;
    }
    if precip_in <= config.precip_risk_min_in {
        return false;
    }
    probability.map_or(true, |p| p >= config.precip_risk_min_probability)
}

/// Wind-risk flag: the stronger of sustained and gust wind strictly above
/// the configured ceiling. Both missing means no flag.
pub fn wind_risk(
    wind_mph: Option<f64>,
    wind_gust_mph: Option<f64>,
    config: &ForecastConfig,
) -> bool {
    let peak = match (wind_mph, wind_gust_mph) {
        (Some(wind), Some(gust)) => Some(wind.max(gust)),
        (one, other) => one.or(other),
    };
    peak.is_some_and(|speed| speed > config.wind_risk_mph)
}

// ---------------------------------------------------------------------------
// Point-level selectors
// ---------------------------------------------------------------------------

/// Whether a finished point counts as active for a precip warning.
pub fn precip_risk_point(point: &ForecastPoint, config: &ForecastConfig) -> bool {
    precip_risk(
        point.precipitation_type,
        point.precip_inches,
        point.precip_probability,
        config,
    ) || point.alert == Some(WarningKind::Precip)
}

/// Whether a finished point counts as active for a wind warning.
pub fn wind_risk_point(point: &ForecastPoint, config: &ForecastConfig) -> bool {
    wind_risk(point.wind_mph, point.wind_gust_mph, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ForecastConfig {
        ForecastConfig::default()
    }

    // --- precipitation_type -------------------------------------------------

    #[test]
    fn test_snow_depth_classifies_as_snow() {
        let phase = precipitation_type(0.5, 0.1, Some(28.0));
        assert_eq!(phase, PrecipitationType::Snow);
    }

    #[test]
    fn test_snow_wins_over_rain_when_both_present() {
        // Warm slot with both layers reporting: snow depth takes priority.
        let phase = precipitation_type(0.2, 0.3, Some(40.0));
        assert_eq!(phase, PrecipitationType::Snow);
    }

    #[test]
    fn test_liquid_above_freezing_is_rain() {
        let phase = precipitation_type(0.0, 0.1, Some(40.0));
        assert_eq!(phase, PrecipitationType::Rain);
    }

    #[test]
    fn test_liquid_at_or_below_freezing_is_not_rain() {
        assert_eq!(
            precipitation_type(0.0, 0.1, Some(32.0)),
            PrecipitationType::None
        );
        assert_eq!(
            precipitation_type(0.0, 0.1, Some(20.0)),
            PrecipitationType::None
        );
    }

    #[test]
    fn test_liquid_with_unknown_temperature_reads_as_rain() {
        assert_eq!(precipitation_type(0.0, 0.1, None), PrecipitationType::Rain);
    }

    #[test]
    fn test_dry_slot_is_none() {
        assert_eq!(
            precipitation_type(0.0, 0.0, Some(25.0)),
            PrecipitationType::None
        );
    }

    // --- is_favorable -------------------------------------------------------

    #[test]
    fn test_clear_dry_slot_is_favorable() {
        assert!(is_favorable(Some(10.0), 0.0, &config()));
    }

    #[test]
    fn test_cloudy_slot_is_not_favorable() {
        assert!(!is_favorable(Some(50.0), 0.0, &config()));
    }

    #[test]
    fn test_ceiling_is_exclusive() {
        assert!(!is_favorable(Some(30.0), 0.0, &config()));
        assert!(is_favorable(Some(29.9), 0.0, &config()));
    }

    #[test]
    fn test_trace_precip_does_not_disqualify() {
        // Exactly at the trace threshold still counts as favorable.
        assert!(is_favorable(Some(10.0), 0.02, &config()));
        assert!(!is_favorable(Some(10.0), 0.03, &config()));
    }

    #[test]
    fn test_unknown_cloud_cover_is_not_favorable() {
        assert!(!is_favorable(None, 0.0, &config()));
    }

    // --- precip_risk --------------------------------------------------------

    #[test]
    fn test_rain_with_amount_and_probability_flags() {
        assert!(precip_risk(
            PrecipitationType::Rain,
            0.1,
            Some(60.0),
            &config()
        ));
    }

    #[test]
    fn test_missing_probability_fails_open() {
        // Unknown probability is treated as meeting the threshold.
        assert!(precip_risk(PrecipitationType::Rain, 0.1, None, &config()));
    }

    #[test]
    fn test_low_probability_suppresses_flag() {
        assert!(!precip_risk(
            PrecipitationType::Rain,
            0.1,
            Some(5.0),
            &config()
        ));
    }

    #[test]
    fn test_trace_amount_suppresses_flag() {
        assert!(!precip_risk(
            PrecipitationType::Rain,
            0.02,
            Some(90.0),
            &config()
        ));
    }

    #[test]
    fn test_snow_phase_never_precip_risk() {
        assert!(!precip_risk(
            PrecipitationType::Snow,
            0.5,
            Some(100.0),
            &config()
        ));
    }

    // --- wind_risk ----------------------------------------------------------

    #[test]
    fn test_gust_above_ceiling_flags() {
        assert!(wind_risk(Some(12.0), Some(25.0), &config()));
    }

    #[test]
    fn test_sustained_alone_can_flag() {
        assert!(wind_risk(Some(22.0), None, &config()));
    }

    #[test]
    fn test_ceiling_is_strictly_greater_than() {
        assert!(!wind_risk(Some(20.0), Some(20.0), &config()));
        assert!(wind_risk(Some(20.1), None, &config()));
    }

    #[test]
    fn test_no_wind_data_no_flag() {
        assert!(!wind_risk(None, None, &config()));
    }
}
