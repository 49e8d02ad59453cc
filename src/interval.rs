/// ISO 8601 interval-string parsing.
///
/// NWS gridpoint layers key every value by an interval string in one of
/// three shapes, distinguished by a `/` separator and what follows it:
///
///   "2026-02-21T06:00:00+00:00"                       point sample
///   "2026-02-21T06:00:00+00:00/PT6H"                  start + duration
///   "2026-02-21T06:00:00+00:00/2026-02-21T12:00:00Z"  start + end
///
/// chrono has no ISO 8601 duration parser, so the duration grammar is
/// implemented here (weeks, days, and the T-prefixed time components,
/// integer values only). Calendar components (years, months) are not
/// supported and fall back to the literal-end-timestamp path.

use crate::model::{ForecastError, TimeInterval};
use chrono::{DateTime, Duration, Utc};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

// ---------------------------------------------------------------------------
// Interval parsing
// ---------------------------------------------------------------------------

/// Decodes one interval string into a concrete `(start, end)` range,
/// normalized to UTC.
///
/// Returns an error only when the *start* timestamp is unparseable —
/// callers drop such entries from the series. A bad second token degrades:
/// duration-parse failure falls back to reading it as a literal end
/// timestamp, and if that fails too the interval degrades to a point
/// sample rather than erroring.
pub fn parse_interval(valid_time: &str) -> Result<TimeInterval, ForecastError> {
    let (start_token, end_token) = match valid_time.split_once('/') {
        Some((start, rest)) => (start, Some(rest)),
        None => (valid_time, None),
    };

    let start = parse_timestamp(start_token)?;

    let end = match end_token {
        None => start,
        Some(token) if token.starts_with('P') => match parse_iso_duration(token) {
            Some(duration) => start + duration,
            None => parse_timestamp(token).unwrap_or(start),
        },
        Some(token) => parse_timestamp(token).unwrap_or(start),
    };

    // A second timestamp earlier than the start is clamped to a point
    // sample so the `end >= start` invariant holds unconditionally.
    let end = end.max(start);

    Ok(TimeInterval { start, end })
}

fn parse_timestamp(token: &str) -> Result<DateTime<Utc>, ForecastError> {
    DateTime::parse_from_rfc3339(token)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ForecastError::Parse(format!("bad timestamp '{}': {}", token, e)))
}

// ---------------------------------------------------------------------------
// ISO 8601 duration parsing
// ---------------------------------------------------------------------------

/// Parses a `P[nW]` / `P[nD][T[nH][nM][nS]]` duration token. Returns
/// `None` for anything outside that grammar, including calendar
/// components and empty durations.
fn parse_iso_duration(token: &str) -> Option<Duration> {
    let body = token.strip_prefix('P')?;
    if body.is_empty() {
        return None;
    }

    let mut total_seconds: i64 = 0;
    let mut digits = String::new();
    let mut in_time_part = false;
    let mut saw_component = false;

    for ch in body.chars() {
        match ch {
            'T' if !in_time_part && digits.is_empty() => in_time_part = true,
            '0'..='9' => digits.push(ch),
            'W' | 'D' | 'H' | 'M' | 'S' => {
                let count: i64 = digits.parse().ok()?;
                digits.clear();
                let unit_seconds = match (ch, in_time_part) {
                    ('W', false) => SECONDS_PER_WEEK,
                    ('D', false) => SECONDS_PER_DAY,
                    ('H', true) => SECONDS_PER_HOUR,
                    // 'M' before the T designator would mean months.
                    ('M', true) => SECONDS_PER_MINUTE,
                    ('S', true) => 1,
                    _ => return None,
                };
                total_seconds = total_seconds.checked_add(count.checked_mul(unit_seconds)?)?;
                saw_component = true;
            }
            _ => return None,
        }
    }

    if !digits.is_empty() || !saw_component {
        return None;
    }

    Some(Duration::seconds(total_seconds))
}
