use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// One CSV row as produced by the parser: column name → raw cell text.
pub type RawRecord = HashMap<String, String>;

pub const COL_REVIEW_ID: &str = "review_id";
pub const COL_APP_NAME: &str = "app_name";
pub const COL_REVIEW_LANGUAGE: &str = "review_language";
pub const COL_DEVICE_TYPE: &str = "device_type";
pub const COL_REVIEW_DATE: &str = "review_date";
pub const COL_RATING: &str = "rating";
pub const COL_VERIFIED_PURCHASE: &str = "verified_purchase";
pub const COL_NUM_HELPFUL_VOTES: &str = "num_helpful_votes";
pub const COL_USER_ID: &str = "user_id";
pub const COL_USER_AGE: &str = "user_age";
pub const COL_USER_COUNTRY: &str = "user_country";
pub const COL_USER_GENDER: &str = "user_gender";

/// The fixed column set of a review export, in file order.
pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_REVIEW_ID,
    COL_APP_NAME,
    COL_REVIEW_LANGUAGE,
    COL_DEVICE_TYPE,
    COL_REVIEW_DATE,
    COL_RATING,
    COL_VERIFIED_PURCHASE,
    COL_NUM_HELPFUL_VOTES,
    COL_USER_ID,
    COL_USER_AGE,
    COL_USER_COUNTRY,
    COL_USER_GENDER,
];

/// Columns that may be blank without the row being dropped.
pub const OPTIONAL_COLUMNS: &[&str] = &[COL_USER_GENDER];

// ── NormalizeMode ─────────────────────────────────────────────────────────────

/// How the normalizer treats rows whose non-blank cells fail coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMode {
    /// Keep the row; failed cells become [`Coerced::Invalid`].
    #[default]
    BestEffort,
    /// Drop any row with at least one failed coercion.
    Strict,
}

// ── Coerced ───────────────────────────────────────────────────────────────────

/// Outcome of coercing a non-blank raw string into a typed value.
///
/// Rows are not dropped when a coercion fails; the failure travels with the
/// record as [`Coerced::Invalid`] and serializes as `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<T> {
    /// The raw text parsed cleanly.
    Valid(T),
    /// The raw text could not be interpreted; the original is kept.
    Invalid { raw: String },
}

impl<T> Coerced<T> {
    pub fn invalid(raw: impl Into<String>) -> Self {
        Coerced::Invalid { raw: raw.into() }
    }

    /// The parsed value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Coerced::Valid(v) => Some(v),
            Coerced::Invalid { .. } => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Coerced::Valid(_))
    }

    /// The rejected raw text, if the coercion failed.
    pub fn invalid_raw(&self) -> Option<&str> {
        match self {
            Coerced::Valid(_) => None,
            Coerced::Invalid { raw } => Some(raw.as_str()),
        }
    }
}

impl Coerced<f64> {
    /// The numeric value, or NaN when the coercion failed.
    pub fn as_f64(&self) -> f64 {
        match self {
            Coerced::Valid(v) => *v,
            Coerced::Invalid { .. } => f64::NAN,
        }
    }
}

impl<T: Serialize> Serialize for Coerced<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Coerced::Valid(v) => v.serialize(serializer),
            Coerced::Invalid { .. } => serializer.serialize_none(),
        }
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// Reviewer attributes, nested under [`NormalizedRecord::user`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub user_id: Coerced<i64>,
    pub user_age: Coerced<i64>,
    pub user_country: String,
    /// `None` when the source cell was blank.
    pub user_gender: Option<String>,
}

/// A review row after blank filtering, type coercion and user-field nesting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub review_id: Coerced<i64>,
    pub app_name: String,
    pub review_language: String,
    pub device_type: String,
    pub review_date: Coerced<NaiveDate>,
    /// Star rating, nominally 0–5. Not clamped.
    pub rating: Coerced<f64>,
    pub verified_purchase: bool,
    pub num_helpful_votes: Coerced<i64>,
    pub user: UserProfile,
}

impl NormalizedRecord {
    /// Rating as a float; NaN when the raw rating did not parse.
    pub fn rating_value(&self) -> f64 {
        self.rating.as_f64()
    }

    /// Names of the columns whose coercion failed, in column order.
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let checks = [
            (COL_REVIEW_ID, self.review_id.is_valid()),
            (COL_REVIEW_DATE, self.review_date.is_valid()),
            (COL_RATING, self.rating.is_valid()),
            (COL_NUM_HELPFUL_VOTES, self.num_helpful_votes.is_valid()),
            (COL_USER_ID, self.user.user_id.is_valid()),
            (COL_USER_AGE, self.user.user_age.is_valid()),
        ];
        checks
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| name)
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
