/// Unit conversion and numeric extraction.
///
/// Every function here is total over its nullable input domain: null in,
/// null out — except the amount converters, which resolve unknown amounts
/// to zero. This is the only module allowed to see `RawValue`; everything
/// downstream works with strict `Option<f64>` / `f64`.

use crate::model::RawValue;
use regex::Regex;
use std::sync::OnceLock;

const MM_PER_INCH_FACTOR: f64 = 0.0393701;
const KMH_PER_MPH_FACTOR: f64 = 0.621371;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-?\d+(\.\d+)?").expect("static pattern compiles"))
}

fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}

// ---------------------------------------------------------------------------
// Numeric extraction
// ---------------------------------------------------------------------------

/// Extracts a numeric value from a raw wire value.
///
/// Numbers pass through as-is (non-finite values read as missing). Strings
/// are scanned for signed decimal literals: exactly one match returns it,
/// two or more return the mean of the first two — this models textual
/// ranges like "40 to 60 percent" or "40-60". No match, and null, return
/// `None`.
pub fn numeric_value(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Number(n) if n.is_finite() => Some(*n),
        RawValue::Number(_) => None,
        RawValue::Text(text) => {
            let bytes = text.as_bytes();
            let numbers: Vec<f64> = number_pattern()
                .find_iter(text)
                .filter_map(|m| {
                    let mut literal = m.as_str();
                    // A '-' directly after a digit separates a range
                    // ("40-60"), it is not a sign.
                    if literal.starts_with('-')
                        && m.start() > 0
                        && bytes[m.start() - 1].is_ascii_digit()
                    {
                        literal = &literal[1..];
                    }
                    literal.parse::<f64>().ok()
                })
                .filter(|n| n.is_finite())
                .collect();
            match numbers.len() {
                0 => None,
                1 => Some(numbers[0]),
                // "40-60" reads as a range; average the endpoints.
                _ => Some((numbers[0] + numbers[1]) / 2.0),
            }
        }
        RawValue::Missing => None,
    }
}

// ---------------------------------------------------------------------------
// Amount converters (unknown -> 0)
// ---------------------------------------------------------------------------

/// Converts a raw millimeter amount to inches, rounded to 2 decimal places.
///
/// A missing or unparseable amount yields `0.0`, not null — snowfall and
/// precipitation totals default to zero, distinct from "unknown".
pub fn mm_to_inches(raw: &RawValue) -> f64 {
    match numeric_value(raw) {
        Some(mm) => round_to(mm * MM_PER_INCH_FACTOR, 2),
        None => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Scalar converters (null-propagating)
// ---------------------------------------------------------------------------

/// Celsius to Fahrenheit, rounded to 1 decimal place.
pub fn c_to_f(celsius: Option<f64>) -> Option<f64> {
    celsius.map(|c| round_to(c * 9.0 / 5.0 + 32.0, 1))
}

/// km/h to mph, rounded to 1 decimal place.
pub fn kmh_to_mph(kmh: Option<f64>) -> Option<f64> {
    kmh.map(|k| round_to(k * KMH_PER_MPH_FACTOR, 1))
}
