//! Blank filtering and type coercion for raw review rows.
//!
//! A row is dropped when any field other than `user_gender` is blank, extra
//! export columns included, or when one of the text columns is absent.
//! Survivors are retyped into [`NormalizedRecord`]s with the user columns
//! nested under `user`.
//! An absent numeric or date column, like an unparseable one, becomes
//! [`Coerced::Invalid`]; such rows are only dropped under
//! [`NormalizeMode::Strict`].

use review_core::coercion::{coerce_bool, coerce_date, coerce_float, coerce_int};
use review_core::models::{
    Coerced, NormalizeMode, NormalizedRecord, RawRecord, UserProfile, COL_APP_NAME, COL_DEVICE_TYPE,
    COL_NUM_HELPFUL_VOTES, COL_RATING, COL_REVIEW_DATE, COL_REVIEW_ID, COL_REVIEW_LANGUAGE,
    COL_USER_AGE, COL_USER_COUNTRY, COL_USER_GENDER, COL_USER_ID, COL_VERIFIED_PURCHASE,
    OPTIONAL_COLUMNS,
};
use serde::Serialize;
use tracing::debug;

// ── NormalizeReport ───────────────────────────────────────────────────────────

/// Counts describing what a normalization pass did with its input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    /// Raw rows handed to the normalizer.
    pub rows_seen: usize,
    /// Records emitted.
    pub kept: usize,
    /// Rows dropped for a blank or missing required column.
    pub dropped_blank: usize,
    /// Rows dropped in strict mode for a failed coercion.
    pub dropped_invalid: usize,
    /// Failed coercions carried by kept records.
    pub invalid_fields: usize,
}

impl NormalizeReport {
    pub fn rows_dropped(&self) -> usize {
        self.dropped_blank + self.dropped_invalid
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// `true` for a missing, empty or whitespace-only cell.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Columns copied verbatim; the record cannot be built without them.
const TEXT_COLUMNS: &[&str] = &[
    COL_APP_NAME,
    COL_REVIEW_LANGUAGE,
    COL_DEVICE_TYPE,
    COL_USER_COUNTRY,
];

/// Returns `true` when the row must be dropped: any field other than
/// `user_gender` is blank, extra export columns included, or a text column
/// is absent.
pub fn has_blank_required_field(raw: &RawRecord) -> bool {
    let blank_field = raw
        .iter()
        .filter(|(column, _)| !OPTIONAL_COLUMNS.contains(&column.as_str()))
        .any(|(_, value)| is_blank(Some(value.as_str())));

    blank_field || TEXT_COLUMNS.iter().any(|column| !raw.contains_key(*column))
}

/// Normalize one raw row, or `None` when it must be dropped for a blank
/// required column.
pub fn normalize_record(raw: &RawRecord) -> Option<NormalizedRecord> {
    if has_blank_required_field(raw) {
        return None;
    }

    let user = UserProfile {
        user_id: coerce_cell(raw, COL_USER_ID, coerce_int),
        user_age: coerce_cell(raw, COL_USER_AGE, coerce_int),
        user_country: cell(raw, COL_USER_COUNTRY)?.to_string(),
        user_gender: cell(raw, COL_USER_GENDER)
            .filter(|gender| !gender.trim().is_empty())
            .map(str::to_string),
    };

    Some(NormalizedRecord {
        review_id: coerce_cell(raw, COL_REVIEW_ID, coerce_int),
        app_name: cell(raw, COL_APP_NAME)?.to_string(),
        review_language: cell(raw, COL_REVIEW_LANGUAGE)?.to_string(),
        device_type: cell(raw, COL_DEVICE_TYPE)?.to_string(),
        review_date: coerce_cell(raw, COL_REVIEW_DATE, coerce_date),
        rating: coerce_cell(raw, COL_RATING, coerce_float),
        verified_purchase: cell(raw, COL_VERIFIED_PURCHASE)
            .map(coerce_bool)
            .unwrap_or(false),
        num_helpful_votes: coerce_cell(raw, COL_NUM_HELPFUL_VOTES, coerce_int),
        user,
    })
}

/// Best-effort normalization of a batch, preserving input order.
pub fn normalize_records(raws: &[RawRecord]) -> Vec<NormalizedRecord> {
    normalize_records_with(raws, NormalizeMode::BestEffort).0
}

/// Normalize a batch under `mode` and report what was kept and dropped.
pub fn normalize_records_with(
    raws: &[RawRecord],
    mode: NormalizeMode,
) -> (Vec<NormalizedRecord>, NormalizeReport) {
    let mut records = Vec::with_capacity(raws.len());
    let mut report = NormalizeReport {
        rows_seen: raws.len(),
        ..Default::default()
    };

    for raw in raws {
        let Some(record) = normalize_record(raw) else {
            report.dropped_blank += 1;
            continue;
        };

        let invalid = record.invalid_fields().len();
        if invalid > 0 && mode == NormalizeMode::Strict {
            report.dropped_invalid += 1;
            continue;
        }

        report.invalid_fields += invalid;
        records.push(record);
    }

    report.kept = records.len();

    debug!(
        "Normalized {} rows: {} kept, {} blank, {} invalid dropped, {} invalid fields kept",
        report.rows_seen,
        report.kept,
        report.dropped_blank,
        report.dropped_invalid,
        report.invalid_fields,
    );

    (records, report)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn cell<'a>(raw: &'a RawRecord, column: &str) -> Option<&'a str> {
    raw.get(column).map(String::as_str)
}

/// Coerce a typed column; an absent column is invalid with empty raw text.
fn coerce_cell<T>(
    raw: &RawRecord,
    column: &str,
    coerce: fn(&str) -> Coerced<T>,
) -> Coerced<T> {
    cell(raw, column).map_or_else(|| Coerced::invalid(""), coerce)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
