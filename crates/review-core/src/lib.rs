//! Shared types for the review analyzer.
//!
//! Holds the review data model, the error type, cell coercion helpers, the
//! sentiment labeler, display formatting and CLI settings. Nothing in this
//! crate touches the filesystem.

pub mod coercion;
pub mod error;
pub mod formatting;
pub mod models;
pub mod sentiment;
pub mod settings;

pub use error::{Result, ReviewError};
pub use models::{Coerced, NormalizeMode, NormalizedRecord, RawRecord, UserProfile};
pub use sentiment::{label_sentiment, Sentiment};
