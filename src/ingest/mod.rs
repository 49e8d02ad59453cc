/// External data boundary: the NWS gridpoint client and the injected
/// response cache. Nothing in here is required by the core pipeline,
/// which accepts already-decoded series.
///
/// Submodules:
/// - `nws` — gridpoint API client and wire-format structs.
/// - `cache` — get/set-with-TTL capability and in-memory implementation.

pub mod cache;
pub mod nws;
