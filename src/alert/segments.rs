/// Warning segment construction.
///
/// Turns per-slot risk flags into human-presentable contiguous warning
/// ranges. The shape is two explicit passes:
///
///   1. a greedy scan that extends a segment across consecutive active
///      slots, closing it when a single inactive slot appears or when
///      extending would push the segment past the maximum span;
///   2. a bounded merge that folds index-adjacent segments back together
///      when the junction between them still falls inside the window —
///      recovering runs that were split only by the ceiling check, never
///      runs split by a true inactive gap.
///
/// Collapsing these into one pass changes the output for runs that
/// straddle the ceiling. Keep them separate.

use crate::config::ForecastConfig;
use crate::model::{ForecastPoint, SegmentStats, WarningKind, WarningSegment};
use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Span construction
// ---------------------------------------------------------------------------

/// A segment's extent before stats are attached.
#[derive(Debug, Clone)]
struct SegmentSpan {
    start_index: usize,
    end_index: usize,
    start_label: String,
    end_label: String,
    start_time_ms: i64,
    end_time_ms: i64,
}

fn format_label(time: DateTime<Utc>) -> String {
    // "Feb 21, 6am" — fixed UTC presentation; locale-aware display
    // formatting belongs to the excluded UI layer.
    time.format("%b %-d, %-I%P").to_string()
}

fn open_span(index: usize, point: &ForecastPoint) -> SegmentSpan {
    SegmentSpan {
        start_index: index,
        end_index: index,
        start_label: format_label(point.time),
        end_label: format_label(point.end_time),
        start_time_ms: point.time.timestamp_millis(),
        end_time_ms: point.end_time.timestamp_millis(),
    }
}

/// Pass 1: greedy build under the span ceiling. An inactive slot closes
/// the open segment immediately; an active slot whose end would stretch
/// the segment past the ceiling closes it and opens a new one there.
fn build_spans(
    points: &[ForecastPoint],
    is_active: &dyn Fn(&ForecastPoint) -> bool,
    max_span_ms: i64,
) -> Vec<SegmentSpan> {
    let mut spans: Vec<SegmentSpan> = Vec::new();
    let mut open: Option<SegmentSpan> = None;

    for (index, point) in points.iter().enumerate() {
        if !is_active(point) {
            if let Some(span) = open.take() {
                spans.push(span);
            }
            continue;
        }

        let end_ms = point.end_time.timestamp_millis();
        match open.as_mut() {
            None => open = Some(open_span(index, point)),
            Some(span) if end_ms - span.start_time_ms > max_span_ms => {
                spans.push(open.take().expect("span is open"));
                open = Some(open_span(index, point));
            }
            Some(span) => {
                span.end_index = index;
                span.end_label = format_label(point.end_time);
                span.end_time_ms = end_ms;
            }
        }
    }

    if let Some(span) = open {
        spans.push(span);
    }
    spans
}

/// Pass 2: bounded merge. Only index-adjacent spans are candidates —
/// a span that begins right where its predecessor ended was split by the
/// ceiling check, not by an inactive slot — and the fold happens only
/// when the junction (the later span's start) is still within the window
/// measured from the earlier span's start. Measuring the junction rather
/// than the combined end is what lets a ceiling split fold at all: the
/// combined end always overshoots the window, that being why the build
/// pass split there in the first place.
fn merge_spans(spans: Vec<SegmentSpan>, max_span_ms: i64) -> Vec<SegmentSpan> {
    let mut merged: Vec<SegmentSpan> = Vec::new();
    for span in spans {
        if let Some(current) = merged.last_mut() {
            let adjacent = span.start_index == current.end_index + 1;
            let within_window = span.start_time_ms - current.start_time_ms <= max_span_ms;
            if adjacent && within_window {
                current.end_index = span.end_index;
                current.end_label = span.end_label;
                current.end_time_ms = span.end_time_ms;
                continue;
            }
        }
        merged.push(span);
    }
    merged
}

// ---------------------------------------------------------------------------
// Segment statistics
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Aggregates over the slots actually active for `kind` inside the span.
/// Inactive slots that slipped into the index range via merging are
/// excluded from the average/peak computation.
fn span_stats(
    points: &[ForecastPoint],
    span: &SegmentSpan,
    kind: WarningKind,
    is_active: &dyn Fn(&ForecastPoint) -> bool,
) -> SegmentStats {
    let active: Vec<&ForecastPoint> = points[span.start_index..=span.end_index]
        .iter()
        .filter(|point| is_active(point))
        .collect();

    match kind {
        WarningKind::Precip => {
            let probabilities: Vec<f64> = active
                .iter()
                .filter_map(|point| point.precip_probability)
                .collect();
            let total_precip_in = active.iter().map(|point| point.precip_inches).sum();
            SegmentStats::Precip {
                average_probability: mean(&probabilities),
                total_precip_in,
            }
        }
        WarningKind::Wind => {
            let winds: Vec<f64> = active.iter().filter_map(|point| point.wind_mph).collect();
            let peak_mph = active
                .iter()
                .filter_map(|point| point.wind_gust_mph)
                .fold(None, |peak: Option<f64>, gust| {
                    Some(peak.map_or(gust, |p| p.max(gust)))
                });
            SegmentStats::Wind {
                average_mph: mean(&winds),
                peak_mph,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Builds the merged, summarized warning segments of one kind.
///
/// `is_active` decides which slots count for this kind. No active slots
/// yields an empty vec, not an error.
pub fn build_warning_segments(
    points: &[ForecastPoint],
    kind: WarningKind,
    is_active: &dyn Fn(&ForecastPoint) -> bool,
    config: &ForecastConfig,
) -> Vec<WarningSegment> {
    let max_span_ms = config.max_warning_span_ms();
    let spans = merge_spans(build_spans(points, is_active, max_span_ms), max_span_ms);

    spans
        .into_iter()
        .map(|span| {
            let stats = span_stats(points, &span, kind, is_active);
            WarningSegment {
                kind,
                start_index: span.start_index,
                end_index: span.end_index,
                start_label: span.start_label,
                end_label: span.end_label,
                start_time_ms: span.start_time_ms,
                end_time_ms: span.end_time_ms,
                stats,
            }
        })
        .collect()
}

/// Pools every kind's segments into one presentation list, ordered by
/// start index. The sort is stable, so precip segments come first when
/// two kinds start on the same slot.
pub fn consolidate(groups: Vec<Vec<WarningSegment>>) -> Vec<WarningSegment> {
    let mut pooled: Vec<WarningSegment> = groups.into_iter().flatten().collect();
    pooled.sort_by_key(|segment| segment.start_index);
    pooled
}
