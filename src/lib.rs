/// powder_service — snow-centric forecast normalization.
///
/// Ingests irregular NWS gridpoint series (interval-keyed snowfall,
/// precipitation, temperature, wind, and sky-cover layers on mixed
/// cadences) and produces one regular, unit-normalized timeline of
/// forecast points with derived signals (bluebird windows, precipitation
/// and wind risk) plus coalesced warning segments for presentation.
///
/// The pipeline (`pipeline::build_forecast`) is pure and synchronous;
/// fetching and caching live behind the `ingest` boundary and are
/// injected, never implied.

pub mod alert;
pub mod analysis;
pub mod config;
pub mod ingest;
pub mod interval;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod units;
