/// Timeline reconciliation: slot union and nearest-neighbor gap filling.
///
/// Gridpoint layers arrive on different native cadences (hourly snowfall,
/// 3-hourly sky cover, 6-hourly QPF) with entries missing outright. The
/// reconciler builds one shared timeline from the union of every layer's
/// interval starts, then fills each layer's gaps with the closer of its
/// previous or next known value.
///
/// The fill is a deterministic two-pass O(n) scan producing parallel
/// previous-candidate and next-candidate arrays, followed by a selection
/// pass. It never looks past the nearest candidate on each side — no
/// interpolation, no invented extremes. Exact-distance ties resolve to
/// the previous (earlier) value. Repeated-rescan implementations change
/// that tie-breaking subtly, which is why the passes stay explicit.

use crate::model::TimeInterval;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// One quantity's series after interval parsing and unit conversion.
pub type ParsedSeries = Vec<(TimeInterval, Option<f64>)>;

// ---------------------------------------------------------------------------
// Slot union
// ---------------------------------------------------------------------------

/// Union of every series' interval start-times, sorted ascending and
/// deduplicated. These are the slots of the output timeline.
pub fn slot_union(series: &[&ParsedSeries]) -> Vec<DateTime<Utc>> {
    let mut slots: Vec<DateTime<Utc>> = series
        .iter()
        .flat_map(|entries| entries.iter().map(|(interval, _)| interval.start))
        .collect();
    slots.sort_unstable();
    slots.dedup();
    slots
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Maps one series onto the shared slots: the value whose interval starts
/// exactly at the slot, else None. When a series carries duplicate start
/// times the later entry wins.
pub fn align(slots: &[DateTime<Utc>], series: &ParsedSeries) -> Vec<Option<f64>> {
    let mut by_start: HashMap<DateTime<Utc>, Option<f64>> =
        HashMap::with_capacity(series.len());
    for (interval, value) in series {
        by_start.insert(interval.start, *value);
    }
    slots
        .iter()
        .map(|slot| by_start.get(slot).copied().flatten())
        .collect()
}

// ---------------------------------------------------------------------------
// Nearest-neighbor fill
// ---------------------------------------------------------------------------

/// Fills null slots with the temporally-nearest known value from either
/// side. Slots with no known value on either side stay null; an
/// already-dense series comes back unchanged.
pub fn fill_nearest(slot_times: &[DateTime<Utc>], values: &[Option<f64>]) -> Vec<Option<f64>> {
    assert_eq!(
        slot_times.len(),
        values.len(),
        "slot_times and values must be parallel"
    );
    if values.is_empty() {
        return Vec::new();
    }

    let time_ms: Vec<i64> = slot_times.iter().map(|t| t.timestamp_millis()).collect();
    let n = values.len();

    // Pass 1: nearest preceding known value per slot.
    let mut previous: Vec<Option<(f64, i64)>> = vec![None; n];
    let mut last_seen: Option<(f64, i64)> = None;
    for idx in 0..n {
        if let Some(value) = values[idx] {
            last_seen = Some((value, time_ms[idx]));
        }
        previous[idx] = last_seen;
    }

    // Pass 2: nearest following known value per slot.
    let mut next: Vec<Option<(f64, i64)>> = vec![None; n];
    let mut upcoming: Option<(f64, i64)> = None;
    for idx in (0..n).rev() {
        if let Some(value) = values[idx] {
            upcoming = Some((value, time_ms[idx]));
        }
        next[idx] = upcoming;
    }

    // Pass 3: selection. Ties favor the previous value.
    (0..n)
        .map(|idx| {
            if values[idx].is_some() {
                return values[idx];
            }
            match (previous[idx], next[idx]) {
                (None, None) => None,
                (Some((value, _)), None) | (None, Some((value, _))) => Some(value),
                (Some((prev_value, prev_time)), Some((next_value, next_time))) => {
                    let prev_distance = time_ms[idx] - prev_time;
                    let next_distance = next_time - time_ms[idx];
                    if prev_distance <= next_distance {
                        Some(prev_value)
                    } else {
                        Some(next_value)
                    }
                }
            }
        })
        .collect()
}
