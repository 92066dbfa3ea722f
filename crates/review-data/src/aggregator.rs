//! Sentiment tallies grouped by app and by review language.

use indexmap::IndexMap;
use review_core::models::NormalizedRecord;
use review_core::sentiment::{label_sentiment, Sentiment};
use serde::Serialize;

// ── SentimentCounts ───────────────────────────────────────────────────────────

/// Positive / neutral / negative counters for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl SentimentCounts {
    /// Increment the counter for `sentiment`.
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    /// Number of reviews in the group.
    pub fn total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }

    /// Add another group's counters to these.
    pub fn merge(&mut self, other: &SentimentCounts) {
        self.positive += other.positive;
        self.neutral += other.neutral;
        self.negative += other.negative;
    }
}

/// Group key → counters, iterating in first-seen key order.
pub type SentimentTally = IndexMap<String, SentimentCounts>;

// ── Output rows ───────────────────────────────────────────────────────────────

/// Sentiment counts for one app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppSentiment {
    pub app_name: String,
    #[serde(flatten)]
    pub counts: SentimentCounts,
}

/// Sentiment counts for one review language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageSentiment {
    pub review_language: String,
    #[serde(flatten)]
    pub counts: SentimentCounts,
}

// ── SentimentAggregator ───────────────────────────────────────────────────────

/// Stateless helper that buckets normalized reviews by a grouping key.
pub struct SentimentAggregator;

impl SentimentAggregator {
    /// Sentiment counts per `app_name`, in first-seen order.
    pub fn by_app(records: &[NormalizedRecord]) -> Vec<AppSentiment> {
        Self::tally_by(records, |r| r.app_name.as_str())
            .into_iter()
            .map(|(app_name, counts)| AppSentiment { app_name, counts })
            .collect()
    }

    /// Sentiment counts per `review_language`, in first-seen order.
    pub fn by_language(records: &[NormalizedRecord]) -> Vec<LanguageSentiment> {
        Self::tally_by(records, |r| r.review_language.as_str())
            .into_iter()
            .map(|(review_language, counts)| LanguageSentiment {
                review_language,
                counts,
            })
            .collect()
    }

    /// Generic aggregation driver.
    ///
    /// Labels each record from its rating and increments the counter of the
    /// group named by `key_fn`, creating zeroed groups on first sight.
    pub fn tally_by(
        records: &[NormalizedRecord],
        key_fn: impl Fn(&NormalizedRecord) -> &str,
    ) -> SentimentTally {
        let mut tally = SentimentTally::new();

        for record in records {
            let sentiment = label_sentiment(record.rating_value());
            tally
                .entry(key_fn(record).to_string())
                .or_default()
                .record(sentiment);
        }

        tally
    }

    /// Sum the counters of every group.
    pub fn totals<'a>(groups: impl IntoIterator<Item = &'a SentimentCounts>) -> SentimentCounts {
        let mut totals = SentimentCounts::default();
        for counts in groups {
            totals.merge(counts);
        }
        totals
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
