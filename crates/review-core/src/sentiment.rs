use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment bucket derived from a star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label a rating: above 4 is positive, below 2 is negative, anything else
/// (including 2, 4 and NaN) is neutral.
pub fn label_sentiment(rating: f64) -> Sentiment {
    if rating > 4.0 {
        Sentiment::Positive
    } else if rating < 2.0 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}
