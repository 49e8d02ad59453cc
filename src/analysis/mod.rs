/// Analysis passes over parsed gridpoint series.
///
/// Submodules:
/// - `timeline` — slot union, alignment, and nearest-neighbor gap filling.
/// - `signals` — per-slot qualitative signals from quantitative thresholds.

pub mod signals;
pub mod timeline;
