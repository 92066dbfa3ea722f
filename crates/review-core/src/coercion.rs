//! Best-effort conversion of raw CSV cells into typed values.
//!
//! Each function takes a non-blank cell and returns a [`Coerced`] value.
//! Parsing is lenient in the way spreadsheet exports need: surrounding
//! whitespace is ignored and numeric cells keep their leading numeric
//! portion (`"42.0"` → 42, `"3 stars"` → 3.0).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::trace;

use crate::models::Coerced;

/// Date-time layouts tried after RFC 3339. Only the calendar date is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Spelling of an infinite float literal. Case-sensitive.
const INFINITY: &[u8] = b"Infinity";

/// Date-only layouts.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

// ── Integers ──────────────────────────────────────────────────────────────────

/// Parse a base-10 integer from the leading digits of `raw`.
pub fn coerce_int(raw: &str) -> Coerced<i64> {
    let trimmed = raw.trim();
    let end = leading_integer_len(trimmed);
    match trimmed[..end].parse::<i64>() {
        Ok(v) => Coerced::Valid(v),
        Err(_) => Coerced::invalid(raw),
    }
}

// ── Floats ────────────────────────────────────────────────────────────────────

/// Parse the longest leading decimal literal of `raw` as an `f64`.
pub fn coerce_float(raw: &str) -> Coerced<f64> {
    let trimmed = raw.trim();
    let end = leading_float_len(trimmed);
    match trimmed[..end].parse::<f64>() {
        Ok(v) => Coerced::Valid(v),
        Err(_) => Coerced::invalid(raw),
    }
}

// ── Booleans ──────────────────────────────────────────────────────────────────

/// `true` iff the cell reads `"true"` in any letter case.
pub fn coerce_bool(raw: &str) -> bool {
    raw.to_lowercase() == "true"
}

// ── Dates ─────────────────────────────────────────────────────────────────────

/// Parse a calendar date from the formats review exports commonly use.
pub fn coerce_date(raw: &str) -> Coerced<NaiveDate> {
    match parse_date_str(raw.trim()) {
        Some(date) => Coerced::Valid(date),
        None => {
            trace!("could not parse review date \"{}\"", raw);
            Coerced::invalid(raw)
        }
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.date());
        }
    }

    None
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Byte length of an optional sign followed by at least one ASCII digit.
/// Zero when `s` does not start with an integer.
fn leading_integer_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = count_digits(&bytes[start..]);
    if digits == 0 {
        0
    } else {
        start + digits
    }
}

/// Byte length of the leading `[sign] digits [. digits] [e [sign] digits]`
/// or `[sign] Infinity` literal. Zero when there is no mantissa digit.
fn leading_float_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if bytes[i..].starts_with(INFINITY) {
        return i + INFINITY.len();
    }

    let int_digits = count_digits(&bytes[i..]);
    i += int_digits;

    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = count_digits(&bytes[i + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = count_digits(&bytes[j.min(bytes.len())..]);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }

    i
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── coerce_int ────────────────────────────────────────────────────────────

    #[test]
    fn test_coerce_int_plain() {
        assert_eq!(coerce_int("42"), Coerced::Valid(42));
        assert_eq!(coerce_int("-7"), Coerced::Valid(-7));
        assert_eq!(coerce_int("+3"), Coerced::Valid(3));
    }

    #[test]
    fn test_coerce_int_trims_whitespace() {
        assert_eq!(coerce_int("  18 "), Coerced::Valid(18));
    }

    #[test]
    fn test_coerce_int_keeps_leading_digits() {
        assert_eq!(coerce_int("42.0"), Coerced::Valid(42));
        assert_eq!(coerce_int("7 votes"), Coerced::Valid(7));
    }

    #[test]
    fn test_coerce_int_rejects_non_numeric() {
        assert_eq!(coerce_int("abc"), Coerced::invalid("abc"));
        assert_eq!(coerce_int("-"), Coerced::invalid("-"));
        assert_eq!(coerce_int(".5"), Coerced::invalid(".5"));
    }

    #[test]
    fn test_coerce_int_overflow_is_invalid() {
        assert!(!coerce_int("99999999999999999999999").is_valid());
    }

    // ── coerce_float ──────────────────────────────────────────────────────────

    #[test]
    fn test_coerce_float_plain() {
        assert_eq!(coerce_float("4.5"), Coerced::Valid(4.5));
        assert_eq!(coerce_float("1"), Coerced::Valid(1.0));
        assert_eq!(coerce_float(".5"), Coerced::Valid(0.5));
        assert_eq!(coerce_float("-2.25"), Coerced::Valid(-2.25));
    }

    #[test]
    fn test_coerce_float_exponent() {
        assert_eq!(coerce_float("1e3"), Coerced::Valid(1000.0));
        assert_eq!(coerce_float("2.5E-1"), Coerced::Valid(0.25));
        // A dangling exponent marker is not part of the literal.
        assert_eq!(coerce_float("3e"), Coerced::Valid(3.0));
    }

    #[test]
    fn test_coerce_float_keeps_leading_literal() {
        assert_eq!(coerce_float("3 stars"), Coerced::Valid(3.0));
        assert_eq!(coerce_float(" 4.0/5 "), Coerced::Valid(4.0));
    }

    #[test]
    fn test_coerce_float_infinity_literal() {
        assert_eq!(coerce_float("Infinity"), Coerced::Valid(f64::INFINITY));
        assert_eq!(coerce_float("+Infinity"), Coerced::Valid(f64::INFINITY));
        assert_eq!(coerce_float(" -Infinity "), Coerced::Valid(f64::NEG_INFINITY));
        assert_eq!(coerce_float("Infinity stars"), Coerced::Valid(f64::INFINITY));
        assert!(!coerce_float("infinity").is_valid());
        assert!(!coerce_float("Inf").is_valid());
        assert_eq!(
            crate::sentiment::label_sentiment(coerce_float("Infinity").as_f64()),
            crate::sentiment::Sentiment::Positive
        );
    }

    #[test]
    fn test_coerce_float_rejects_non_numeric() {
        assert!(!coerce_float("five").is_valid());
        assert!(!coerce_float(".").is_valid());
        assert!(!coerce_float("-").is_valid());
    }

    // ── coerce_bool ───────────────────────────────────────────────────────────

    #[test]
    fn test_coerce_bool_case_insensitive() {
        assert!(coerce_bool("true"));
        assert!(coerce_bool("TRUE"));
        assert!(coerce_bool("True"));
        assert!(!coerce_bool("false"));
        assert!(!coerce_bool("yes"));
        assert!(!coerce_bool(""));
    }

    // ── coerce_date ───────────────────────────────────────────────────────────

    #[test]
    fn test_coerce_date_iso() {
        let expected = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(coerce_date("2020-01-01"), Coerced::Valid(expected));
    }

    #[test]
    fn test_coerce_date_alternate_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap();
        assert_eq!(coerce_date("2023/07/14"), Coerced::Valid(expected));
        assert_eq!(coerce_date("07/14/2023"), Coerced::Valid(expected));
        assert_eq!(coerce_date("14.07.2023"), Coerced::Valid(expected));
    }

    #[test]
    fn test_coerce_date_with_time_keeps_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(coerce_date("2024-02-29 13:45:00"), Coerced::Valid(expected));
        assert_eq!(coerce_date("2024-02-29T13:45:00"), Coerced::Valid(expected));
        assert_eq!(coerce_date("2024-02-29T13:45:00Z"), Coerced::Valid(expected));
    }

    #[test]
    fn test_coerce_date_invalid() {
        assert_eq!(coerce_date("not a date"), Coerced::invalid("not a date"));
        assert!(!coerce_date("2023-02-30").is_valid());
    }
}
