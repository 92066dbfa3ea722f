//! Data layer for the review analyzer.
//!
//! Responsible for loading CSV review exports, normalizing raw rows into
//! typed records, tallying sentiment per app and per language, computing
//! the summary statistics and running the top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod normalizer;
pub mod reader;
pub mod summary;

pub use review_core as core;
