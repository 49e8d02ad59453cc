/// Time-boxed response caching.
///
/// Gridpoint responses change a few times a day; refetching on every
/// forecast build wastes the NWS rate budget. The cache is an injected
/// capability rather than a process-wide singleton so the client and the
/// pipeline can be tested without a live backend.
///
/// Cache failures are never fatal — a broken cache degrades to a live
/// fetch.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How long a cached gridpoint response stays valid.
pub const DEFAULT_TTL: Duration = Duration::from_secs(4 * 60 * 60);

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Key/value cache with per-entry expiry. Implementations must treat an
/// expired entry as missing.
pub trait GridCache {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: &Value, ttl: Duration);
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// Mutex-guarded in-process cache. Expired entries read as misses and are
/// evicted lazily on the read that finds them expired.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Instant, Value)>>,
}

impl MemoryCache {
    pub fn new() -> MemoryCache {
        MemoryCache {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        MemoryCache::new()
    }
}

impl GridCache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((expiry, value)) if *expiry > Instant::now() => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: &str, value: &Value, ttl: Duration) {
        let expiry = Instant::now() + ttl;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (expiry, value.clone()));
    }
}

/// Always-miss cache for callers that want none.
pub struct NullCache;

impl GridCache for NullCache {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn set(&self, _key: &str, _value: &Value, _ttl: Duration) {}
}
