/// The forecast build pipeline.
///
/// A pure, synchronous transformation from raw gridpoint series plus a
/// threshold configuration to an ordered `ForecastPoint` sequence and its
/// warning segments. No I/O, no clock, no state across invocations —
/// callers may run builds for different locations in parallel with no
/// coordination.
///
/// Stages, strictly downstream:
///   parse intervals + convert units  →  reconcile onto one timeline
///   →  derive per-slot signals  →  group flagged slots into segments
///
/// A malformed entry degrades its own slot to null/zero; the only hard
/// failure is structurally invalid configuration.

use crate::alert::segments::{build_warning_segments, consolidate};
use crate::analysis::signals;
use crate::analysis::timeline::{align, fill_nearest, slot_union, ParsedSeries};
use crate::config::ForecastConfig;
use crate::ingest::cache::GridCache;
use crate::ingest::nws::{fetch_gridpoint_cached, GridKey, GridpointResponse};
use crate::interval::parse_interval;
use crate::logging::{self, DataSource};
use crate::model::{
    ForecastError, ForecastPoint, RawSeriesEntry, RawValue, WarningKind, QTY_PRECIP,
    QTY_PRECIP_PROBABILITY, QTY_SKY_COVER, QTY_SNOWFALL, QTY_TEMPERATURE, QTY_WIND_GUST,
    QTY_WIND_SPEED,
};
use crate::units::{c_to_f, kmh_to_mph, mm_to_inches, numeric_value};

// ---------------------------------------------------------------------------
// Pipeline input/output
// ---------------------------------------------------------------------------

/// The seven raw gridpoint series the pipeline consumes, in provider
/// units. Borrowed from wherever the caller decoded them — the pipeline
/// never fetches.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridSeries<'a> {
    pub snowfall: &'a [RawSeriesEntry],
    pub precip: &'a [RawSeriesEntry],
    pub precip_probability: &'a [RawSeriesEntry],
    pub temperature: &'a [RawSeriesEntry],
    pub wind_speed: &'a [RawSeriesEntry],
    pub wind_gust: &'a [RawSeriesEntry],
    pub sky_cover: &'a [RawSeriesEntry],
}

impl<'a> GridSeries<'a> {
    pub fn from_response(response: &'a GridpointResponse) -> GridSeries<'a> {
        let properties = &response.properties;
        GridSeries {
            snowfall: &properties.snowfall_amount.values,
            precip: &properties.quantitative_precipitation.values,
            precip_probability: &properties.probability_of_precipitation.values,
            temperature: &properties.temperature.values,
            wind_speed: &properties.wind_speed.values,
            wind_gust: &properties.wind_gust.values,
            sky_cover: &properties.sky_cover.values,
        }
    }
}

/// Everything one pipeline run produces, handed to the caller by value.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastBundle {
    pub points: Vec<ForecastPoint>,
    pub warnings: Vec<crate::model::WarningSegment>,
}

// ---------------------------------------------------------------------------
// Stage 1: parse + convert
// ---------------------------------------------------------------------------

/// Parses one quantity's intervals and converts its values. Entries whose
/// interval string fails to parse are dropped from the series — the slot
/// simply has no data for this quantity.
fn parse_series(
    quantity: &str,
    entries: &[RawSeriesEntry],
    convert: impl Fn(&RawValue) -> Option<f64>,
    dropped: &mut usize,
) -> ParsedSeries {
    entries
        .iter()
        .filter_map(|entry| match parse_interval(&entry.valid_time) {
            Ok(interval) => Some((interval, convert(&entry.value))),
            Err(e) => {
                *dropped += 1;
                logging::debug(
                    DataSource::Pipeline,
                    Some(quantity),
                    &format!("dropping entry: {}", e),
                );
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pipeline entry points
// ---------------------------------------------------------------------------

/// Builds the forecast timeline and warning segments from raw series.
pub fn build_forecast(
    series: &GridSeries,
    config: &ForecastConfig,
) -> Result<ForecastBundle, ForecastError> {
    config.validate()?;

    let mut dropped = 0usize;

    // Amounts convert null to zero; scalars propagate null so the
    // reconciler can gap-fill them.
    let snowfall = parse_series(
        QTY_SNOWFALL,
        series.snowfall,
        |raw| Some(mm_to_inches(raw)),
        &mut dropped,
    );
    let precip = parse_series(
        QTY_PRECIP,
        series.precip,
        |raw| Some(mm_to_inches(raw)),
        &mut dropped,
    );
    let probability = parse_series(
        QTY_PRECIP_PROBABILITY,
        series.precip_probability,
        numeric_value,
        &mut dropped,
    );
    let temperature = parse_series(
        QTY_TEMPERATURE,
        series.temperature,
        |raw| c_to_f(numeric_value(raw)),
        &mut dropped,
    );
    let wind = parse_series(
        QTY_WIND_SPEED,
        series.wind_speed,
        |raw| kmh_to_mph(numeric_value(raw)),
        &mut dropped,
    );
    let gust = parse_series(
        QTY_WIND_GUST,
        series.wind_gust,
        |raw| kmh_to_mph(numeric_value(raw)),
        &mut dropped,
    );
    let sky = parse_series(QTY_SKY_COVER, series.sky_cover, numeric_value, &mut dropped);

    // Stage 2: one shared timeline, each quantity gap-filled onto it.
    let slots = slot_union(&[
        &snowfall,
        &precip,
        &probability,
        &temperature,
        &wind,
        &gust,
        &sky,
    ]);

    let snowfall = fill_nearest(&slots, &align(&slots, &snowfall));
    let precip = fill_nearest(&slots, &align(&slots, &precip));
    let probability = fill_nearest(&slots, &align(&slots, &probability));
    let temperature = fill_nearest(&slots, &align(&slots, &temperature));
    let wind = fill_nearest(&slots, &align(&slots, &wind));
    let gust = fill_nearest(&slots, &align(&slots, &gust));
    let sky = fill_nearest(&slots, &align(&slots, &sky));

    // Stage 3: per-slot signal derivation.
    let points: Vec<ForecastPoint> = slots
        .iter()
        .enumerate()
        .map(|(idx, &time)| {
            let inches = snowfall[idx].unwrap_or(0.0);
            let precip_inches = precip[idx].unwrap_or(0.0);
            let phase = signals::precipitation_type(inches, precip_inches, temperature[idx]);
            let favorable = signals::is_favorable(sky[idx], precip_inches, config);
            let precip_risk = signals::precip_risk(phase, precip_inches, probability[idx], config);
            let wind_risk = signals::wind_risk(wind[idx], gust[idx], config);
            let alert = if precip_risk {
                Some(WarningKind::Precip)
            } else if wind_risk {
                Some(WarningKind::Wind)
            } else {
                None
            };

            ForecastPoint {
                time,
                start_time: time,
                end_time: slots.get(idx + 1).copied().unwrap_or(time),
                inches,
                precip_inches,
                precip_probability: probability[idx],
                temperature_f: temperature[idx],
                wind_mph: wind[idx],
                wind_gust_mph: gust[idx],
                cloud_cover: sky[idx],
                precipitation_type: phase,
                is_favorable: favorable,
                alert,
            }
        })
        .collect();

    // Stage 4: warning segments, pooled across kinds.
    let precip_selector = |point: &ForecastPoint| signals::precip_risk_point(point, config);
    let wind_selector = |point: &ForecastPoint| signals::wind_risk_point(point, config);
    let warnings = consolidate(vec![
        build_warning_segments(&points, WarningKind::Precip, &precip_selector, config),
        build_warning_segments(&points, WarningKind::Wind, &wind_selector, config),
    ]);

    logging::log_pipeline_summary(None, points.len(), dropped, warnings.len());

    Ok(ForecastBundle { points, warnings })
}

/// Convenience wiring for callers holding a grid key: cache-aware fetch,
/// decode, then the pure build.
pub fn build_forecast_for_grid(
    client: &reqwest::blocking::Client,
    cache: &dyn GridCache,
    key: &GridKey,
    config: &ForecastConfig,
) -> Result<ForecastBundle, ForecastError> {
    let response = fetch_gridpoint_cached(client, cache, key).map_err(|e| {
        logging::log_nws_failure(&key.cache_key(), "gridpoint fetch", &e);
        e
    })?;
    let series = GridSeries::from_response(&response);
    build_forecast(&series, config)
}
