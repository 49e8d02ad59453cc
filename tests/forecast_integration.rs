/// Integration tests for the full forecast build
///
/// These tests verify:
/// 1. A realistic gridpoint JSON document decodes into the typed layers
/// 2. Full pipeline: decode → parse → reconcile → derive → segment
/// 3. Threshold configuration (TOML overrides) changes the derived output
/// 4. The cache capability round-trips raw documents
///
/// Everything here is offline and deterministic — the fixture mirrors the
/// shape of an api.weather.gov gridpoints response with mixed cadences,
/// a malformed interval, a null value, and a textual range value.

use powder_service::config::ForecastConfig;
use powder_service::ingest::cache::{GridCache, MemoryCache};
use powder_service::ingest::nws::{decode_gridpoint, GridKey};
use powder_service::model::{PrecipitationType, SegmentStats, WarningKind};
use powder_service::pipeline::{build_forecast, ForecastBundle, GridSeries};

use serde_json::{json, Value};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

fn hourly(hour: u32) -> String {
    format!("2026-02-21T{:02}:00:00+00:00", hour)
}

/// Ten hours of forecast: a snowy cold morning (hours 0-5) clearing into
/// a bluebird window (hours 2-4), then warm rain (hours 6-9) turning
/// windy (hours 8-9). Cadences are deliberately mixed: temperature and
/// wind hourly, amounts and sky cover 3-hourly, probability sparser
/// still.
fn gridpoint_fixture() -> Value {
    let three_hourly = |values: [Value; 4]| -> Value {
        json!({
            "uom": "wmoUnit:mm",
            "values": (0..4)
                .map(|i| json!({
                    "validTime": format!("{}/PT3H", hourly(i * 3)),
                    "value": values[i as usize].clone(),
                }))
                .collect::<Vec<Value>>()
        })
    };

    let hourly_layer = |values: &[f64]| -> Value {
        json!({
            "values": values
                .iter()
                .enumerate()
                .map(|(i, v)| json!({
                    "validTime": format!("{}/PT1H", hourly(i as u32)),
                    "value": *v,
                }))
                .collect::<Vec<Value>>()
        })
    };

    json!({
        "id": "https://api.weather.gov/gridpoints/PDT/23,39",
        "properties": {
            "gridId": "PDT",
            "updateTime": "2026-02-21T00:00:00+00:00",
            "snowfallAmount": {
                "uom": "wmoUnit:mm",
                "values": [
                    // 25.4mm = 1.0", 12.7mm = 0.5"
                    { "validTime": format!("{}/PT3H", hourly(0)), "value": 25.4 },
                    { "validTime": format!("{}/PT3H", hourly(3)), "value": 12.7 },
                    { "validTime": format!("{}/PT3H", hourly(6)), "value": 0.0 },
                    { "validTime": format!("{}/PT3H", hourly(9)), "value": 0.0 },
                    // Malformed interval: dropped, never fatal.
                    { "validTime": "not-a-time/PT3H", "value": 99.0 }
                ]
            },
            // 7.62mm = 0.3", 5.08mm = 0.2"
            "quantitativePrecipitation": three_hourly([
                json!(0.0), json!(0.0), json!(7.62), json!(5.08)
            ]),
            "probabilityOfPrecipitation": {
                "uom": "wmoUnit:percent",
                "values": [
                    { "validTime": hourly(0), "value": 20 },
                    { "validTime": hourly(3), "value": null },
                    // Textual range, averages to 70.
                    { "validTime": hourly(6), "value": "60-80" }
                ]
            },
            "temperature": hourly_layer(&[
                -5.0, -5.0, -5.0, -5.0, -5.0, -5.0, 10.0, 10.0, 10.0, 10.0
            ]),
            "windSpeed": hourly_layer(&[
                16.09, 16.09, 16.09, 16.09, 16.09, 16.09, 16.09, 16.09, 40.23, 40.23
            ]),
            "windGust": hourly_layer(&[
                19.31, 19.31, 19.31, 19.31, 19.31, 19.31, 19.31, 19.31, 56.33, 56.33
            ]),
            "skyCover": {
                "uom": "wmoUnit:percent",
                "values": [
                    { "validTime": format!("{}/PT3H", hourly(0)), "value": 90 },
                    { "validTime": format!("{}/PT3H", hourly(3)), "value": 20 },
                    { "validTime": format!("{}/PT3H", hourly(6)), "value": 100 },
                    { "validTime": format!("{}/PT3H", hourly(9)), "value": 95 }
                ]
            }
        }
    })
}

fn build_fixture_bundle(config: &ForecastConfig) -> ForecastBundle {
    let response = decode_gridpoint(gridpoint_fixture()).expect("fixture should decode");
    let series = GridSeries::from_response(&response);
    build_forecast(&series, config).expect("build should succeed")
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

#[test]
fn test_fixture_decodes_all_seven_layers() {
    let response = decode_gridpoint(gridpoint_fixture()).unwrap();
    let p = &response.properties;
    assert_eq!(p.snowfall_amount.values.len(), 5);
    assert_eq!(p.quantitative_precipitation.values.len(), 4);
    assert_eq!(p.probability_of_precipitation.values.len(), 3);
    assert_eq!(p.temperature.values.len(), 10);
    assert_eq!(p.wind_speed.values.len(), 10);
    assert_eq!(p.wind_gust.values.len(), 10);
    assert_eq!(p.sky_cover.values.len(), 4);
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_pipeline_produces_one_point_per_union_slot() {
    let bundle = build_fixture_bundle(&ForecastConfig::default());
    // Hourly temperature dominates the union: ten slots, strictly
    // ascending, malformed snowfall entry dropped.
    assert_eq!(bundle.points.len(), 10);
    for pair in bundle.points.windows(2) {
        assert!(pair[0].time < pair[1].time);
    }
}

#[test]
fn test_amounts_convert_and_carry_across_cadence_gaps() {
    let bundle = build_fixture_bundle(&ForecastConfig::default());
    let inches: Vec<f64> = bundle.points.iter().map(|p| p.inches).collect();
    // 3-hourly snowfall smeared onto hourly slots by nearest-neighbor
    // carry; the 1.5h midpoint ties resolve toward the earlier value.
    assert_eq!(
        inches,
        vec![1.0, 1.0, 0.5, 0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0]
    );

    let precip: Vec<f64> = bundle.points.iter().map(|p| p.precip_inches).collect();
    assert_eq!(
        precip,
        vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.3, 0.3, 0.3, 0.2, 0.2]
    );
}

#[test]
fn test_scalar_layers_convert_to_imperial() {
    let bundle = build_fixture_bundle(&ForecastConfig::default());
    assert_eq!(bundle.points[0].temperature_f, Some(23.0));
    assert_eq!(bundle.points[9].temperature_f, Some(50.0));
    assert_eq!(bundle.points[0].wind_mph, Some(10.0));
    assert_eq!(bundle.points[8].wind_mph, Some(25.0));
    assert_eq!(bundle.points[8].wind_gust_mph, Some(35.0));
}

#[test]
fn test_textual_probability_range_averages_and_fills() {
    let bundle = build_fixture_bundle(&ForecastConfig::default());
    let probability: Vec<Option<f64>> = bundle
        .points
        .iter()
        .map(|p| p.precip_probability)
        .collect();
    // Known at hour 0 (20) and hour 6 ("60-80" = 70); the null entry at
    // hour 3 gap-fills, tie favoring the earlier 20.
    assert_eq!(
        probability,
        vec![
            Some(20.0),
            Some(20.0),
            Some(20.0),
            Some(20.0),
            Some(70.0),
            Some(70.0),
            Some(70.0),
            Some(70.0),
            Some(70.0),
            Some(70.0)
        ]
    );
}

#[test]
fn test_phase_classification_across_the_timeline() {
    let bundle = build_fixture_bundle(&ForecastConfig::default());
    let phases: Vec<PrecipitationType> = bundle
        .points
        .iter()
        .map(|p| p.precipitation_type)
        .collect();
    assert_eq!(
        phases,
        vec![
            PrecipitationType::Snow, // hours 0-4: snow depth present
            PrecipitationType::Snow,
            PrecipitationType::Snow,
            PrecipitationType::Snow,
            PrecipitationType::Snow,
            PrecipitationType::None, // hour 5: liquid but 23F — frozen
            PrecipitationType::Rain, // hours 6-9: liquid at 50F
            PrecipitationType::Rain,
            PrecipitationType::Rain,
            PrecipitationType::Rain
        ]
    );
}

#[test]
fn test_bluebird_window_midday() {
    let bundle = build_fixture_bundle(&ForecastConfig::default());
    let favorable: Vec<bool> = bundle.points.iter().map(|p| p.is_favorable).collect();
    // Sky cover drops to 20% for the 3h-9h block; hours 2-4 are also
    // precipitation-free on the filled timeline.
    assert_eq!(
        favorable,
        vec![false, false, true, true, true, false, false, false, false, false]
    );
}

#[test]
fn test_warning_segments_rain_then_wind() {
    let bundle = build_fixture_bundle(&ForecastConfig::default());
    assert_eq!(bundle.warnings.len(), 2);

    let rain = &bundle.warnings[0];
    assert_eq!(rain.kind, WarningKind::Precip);
    assert_eq!((rain.start_index, rain.end_index), (6, 9));
    assert_eq!(rain.start_label, "Feb 21, 6am");
    assert_eq!(rain.end_label, "Feb 21, 9am");
    match &rain.stats {
        SegmentStats::Precip {
            average_probability,
            total_precip_in,
        } => {
            assert_eq!(*average_probability, Some(70.0));
            assert!((total_precip_in - 1.0).abs() < 1e-9);
        }
        other => panic!("expected precip stats, got {:?}", other),
    }

    let wind = &bundle.warnings[1];
    assert_eq!(wind.kind, WarningKind::Wind);
    assert_eq!((wind.start_index, wind.end_index), (8, 9));
    match &wind.stats {
        SegmentStats::Wind {
            average_mph,
            peak_mph,
        } => {
            assert_eq!(*average_mph, Some(25.0));
            assert_eq!(*peak_mph, Some(35.0));
        }
        other => panic!("expected wind stats, got {:?}", other),
    }
}

#[test]
fn test_per_slot_alerts_favor_precip_over_wind() {
    let bundle = build_fixture_bundle(&ForecastConfig::default());
    // Hours 8-9 carry both risks; the per-slot alert tag reports precip.
    assert_eq!(bundle.points[7].alert, Some(WarningKind::Precip));
    assert_eq!(bundle.points[8].alert, Some(WarningKind::Precip));
    assert_eq!(bundle.points[0].alert, None);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_toml_overrides_change_derived_output() {
    // Raising the wind ceiling above the gusts suppresses the wind
    // segment; everything else is untouched.
    let config = ForecastConfig::from_toml_str("wind_risk_mph = 40.0").unwrap();
    let bundle = build_fixture_bundle(&config);

    assert_eq!(bundle.warnings.len(), 1);
    assert_eq!(bundle.warnings[0].kind, WarningKind::Precip);
}

#[test]
fn test_probability_floor_suppresses_rain_risk() {
    let config = ForecastConfig::from_toml_str("precip_risk_min_probability = 80.0").unwrap();
    let bundle = build_fixture_bundle(&config);

    // Probability tops out at 70; only the wind warning remains.
    assert_eq!(bundle.warnings.len(), 1);
    assert_eq!(bundle.warnings[0].kind, WarningKind::Wind);
    for point in &bundle.points {
        assert_ne!(point.alert, Some(WarningKind::Precip));
    }
}

// ---------------------------------------------------------------------------
// Cache capability
// ---------------------------------------------------------------------------

#[test]
fn test_cache_round_trips_the_raw_document() {
    let cache = MemoryCache::new();
    let key = GridKey::new("PDT", 23, 39);
    let raw = gridpoint_fixture();

    cache.set(&key.cache_key(), &raw, Duration::from_secs(60));
    let cached = cache.get(&key.cache_key()).expect("fresh entry");
    assert_eq!(cached, raw);

    let response = decode_gridpoint(cached).unwrap();
    let bundle = build_forecast(
        &GridSeries::from_response(&response),
        &ForecastConfig::default(),
    )
    .unwrap();
    assert_eq!(bundle.points.len(), 10);
}

#[test]
fn test_expired_cache_entry_is_a_miss() {
    let cache = MemoryCache::new();
    let key = GridKey::new("PDT", 23, 39);
    cache.set(&key.cache_key(), &gridpoint_fixture(), Duration::from_secs(0));
    assert!(cache.get(&key.cache_key()).is_none());
}
