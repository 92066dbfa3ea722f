//! The fixed summary questions: which app has the most reviews, which device
//! dominates that app's reviews, and the app's average rating.

use indexmap::IndexMap;
use review_core::models::NormalizedRecord;
use serde::Serialize;

use crate::aggregator::SentimentAggregator;

/// Answers to the summary questions.
///
/// `avg_rating` is NaN when no app qualifies, and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStatistics {
    pub most_reviewed_app: Option<String>,
    pub most_reviews: u64,
    pub most_used_device: Option<String>,
    pub most_devices: u64,
    pub avg_rating: f64,
}

/// Compute [`SummaryStatistics`] over normalized records.
///
/// Ties on review or device counts go to the key seen first.
pub fn summary_statistics(records: &[NormalizedRecord]) -> SummaryStatistics {
    let by_app = SentimentAggregator::by_app(records);
    let (most_reviewed_app, most_reviews) = first_strict_max(
        by_app
            .iter()
            .map(|app| (app.app_name.as_str(), app.counts.total())),
    );

    let mut device_counts: IndexMap<&str, u64> = IndexMap::new();
    let mut rating_sum = 0.0_f64;
    let mut rating_count = 0_u64;

    if let Some(app) = most_reviewed_app.as_deref() {
        for record in records.iter().filter(|r| r.app_name == app) {
            *device_counts.entry(record.device_type.as_str()).or_default() += 1;
            rating_sum += record.rating_value();
            rating_count += 1;
        }
    }

    // 0 / 0 is NaN: an empty input has no average.
    let avg_rating = rating_sum / rating_count as f64;

    let (most_used_device, most_devices) =
        first_strict_max(device_counts.iter().map(|(device, count)| (*device, *count)));

    SummaryStatistics {
        most_reviewed_app,
        most_reviews,
        most_used_device,
        most_devices,
        avg_rating,
    }
}

/// The key with the largest count, replacing the running best only on a
/// strictly greater count. `(None, 0)` for an empty sequence.
fn first_strict_max<'a>(items: impl IntoIterator<Item = (&'a str, u64)>) -> (Option<String>, u64) {
    let mut best: Option<&str> = None;
    let mut max = 0;
    for (key, count) in items {
        if count > max {
            max = count;
            best = Some(key);
        }
    }
    (best.map(str::to_string), max)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::models::{Coerced, UserProfile};

    fn make_record(app: &str, device: &str, rating: f64) -> NormalizedRecord {
        NormalizedRecord {
            review_id: Coerced::Valid(1),
            app_name: app.to_string(),
            review_language: "en".to_string(),
            device_type: device.to_string(),
            review_date: Coerced::invalid("-"),
            rating: Coerced::Valid(rating),
            verified_purchase: true,
            num_helpful_votes: Coerced::Valid(0),
            user: UserProfile {
                user_id: Coerced::Valid(1),
                user_age: Coerced::Valid(40),
                user_country: "US".to_string(),
                user_gender: Some("F".to_string()),
            },
        }
    }

    // ── first_strict_max ──────────────────────────────────────────────────────

    #[test]
    fn test_first_strict_max_first_seen_wins_ties() {
        let (key, count) = first_strict_max([("a", 2), ("b", 3), ("c", 3), ("d", 1)]);
        assert_eq!(key.as_deref(), Some("b"));
        assert_eq!(count, 3);
    }

    #[test]
    fn test_first_strict_max_empty() {
        assert_eq!(first_strict_max(Vec::<(&str, u64)>::new()), (None, 0));
    }

    // ── summary_statistics ────────────────────────────────────────────────────

    #[test]
    fn test_summary_picks_most_reviewed_app() {
        let records = vec![
            make_record("Slack", "iPad", 3.0),
            make_record("Zoom", "Android", 5.0),
            make_record("Zoom", "iOS", 4.0),
            make_record("Zoom", "Android", 3.0),
            make_record("Slack", "iPad", 1.0),
        ];
        let summary = summary_statistics(&records);

        assert_eq!(summary.most_reviewed_app.as_deref(), Some("Zoom"));
        assert_eq!(summary.most_reviews, 3);
        assert_eq!(summary.most_used_device.as_deref(), Some("Android"));
        assert_eq!(summary.most_devices, 2);
        assert!((summary.avg_rating - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_app_tie_goes_to_first_seen() {
        let records = vec![
            make_record("Slack", "iPad", 2.0),
            make_record("Zoom", "Android", 5.0),
            make_record("Zoom", "iOS", 4.0),
            make_record("Slack", "Web", 4.0),
        ];
        let summary = summary_statistics(&records);

        assert_eq!(summary.most_reviewed_app.as_deref(), Some("Slack"));
        assert_eq!(summary.most_reviews, 2);
        // iPad and Web tie at one review each; iPad was seen first.
        assert_eq!(summary.most_used_device.as_deref(), Some("iPad"));
        assert_eq!(summary.most_devices, 1);
        assert!((summary.avg_rating - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_empty_input() {
        let summary = summary_statistics(&[]);

        assert!(summary.most_reviewed_app.is_none());
        assert_eq!(summary.most_reviews, 0);
        assert!(summary.most_used_device.is_none());
        assert_eq!(summary.most_devices, 0);
        assert!(summary.avg_rating.is_nan());
    }

    #[test]
    fn test_summary_invalid_rating_poisons_average() {
        let mut bad = make_record("Zoom", "iOS", 0.0);
        bad.rating = Coerced::invalid("?");
        let summary = summary_statistics(&[make_record("Zoom", "iOS", 5.0), bad]);

        assert_eq!(summary.most_reviews, 2);
        assert!(summary.avg_rating.is_nan());
    }

    #[test]
    fn test_summary_serialized_field_names() {
        let summary = summary_statistics(&[
            make_record("A", "phone", 4.5),
            make_record("A", "tablet", 1.0),
        ]);
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            serde_json::json!({
                "mostReviewedApp": "A",
                "mostReviews": 2,
                "mostUsedDevice": "phone",
                "mostDevices": 1,
                "avgRating": 2.75,
            })
        );
    }

    #[test]
    fn test_summary_empty_serializes_nulls() {
        let value = serde_json::to_value(summary_statistics(&[])).unwrap();
        assert_eq!(value["mostReviewedApp"], serde_json::Value::Null);
        assert_eq!(value["mostUsedDevice"], serde_json::Value::Null);
        assert_eq!(value["avgRating"], serde_json::Value::Null);
    }
}
