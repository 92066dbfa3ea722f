//! Main analysis pipeline for review exports.
//!
//! Orchestrates loading, normalization, sentiment aggregation and summary
//! statistics, returning an [`AnalysisResult`] ready for reporting.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use review_core::error::Result;
use review_core::models::{NormalizeMode, NormalizedRecord, RawRecord};
use serde::Serialize;
use tracing::debug;

use crate::aggregator::{AppSentiment, LanguageSentiment, SentimentAggregator};
use crate::normalizer::normalize_records_with;
use crate::reader::load_raw_records;
use crate::summary::{summary_statistics, SummaryStatistics};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    /// Input file or directory, when the records came from disk.
    pub source: Option<String>,
    /// Raw rows handed to the normalizer.
    pub rows_read: usize,
    /// Normalized records kept.
    pub records_kept: usize,
    /// Rows dropped for blank columns or, in strict mode, failed coercions.
    pub rows_dropped: usize,
    /// Failed coercions carried by kept records.
    pub invalid_fields: usize,
    /// Whether strict normalization was applied.
    pub strict: bool,
    /// Wall-clock seconds spent reading CSV input.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent normalizing and aggregating.
    pub transform_time_seconds: f64,
}

/// The complete output of [`analyze_reviews`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Normalized records, in input order.
    pub records: Vec<NormalizedRecord>,
    pub by_app: Vec<AppSentiment>,
    pub by_language: Vec<LanguageSentiment>,
    pub summary: SummaryStatistics,
    pub metadata: AnalysisMetadata,
}

/// Serializable view of an [`AnalysisResult`] without the record list.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport<'a> {
    pub by_app: &'a [AppSentiment],
    pub by_language: &'a [LanguageSentiment],
    pub summary: &'a SummaryStatistics,
    pub metadata: &'a AnalysisMetadata,
}

impl AnalysisResult {
    pub fn report(&self) -> AnalysisReport<'_> {
        AnalysisReport {
            by_app: &self.by_app,
            by_language: &self.by_language,
            summary: &self.summary,
            metadata: &self.metadata,
        }
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline on a CSV file or directory.
///
/// 1. Load raw records from `path`.
/// 2. Normalize them under `mode`.
/// 3. Tally sentiment by app and by language.
/// 4. Compute the summary statistics.
pub fn analyze_reviews(path: &Path, mode: NormalizeMode) -> Result<AnalysisResult> {
    let load_start = Instant::now();
    let raws = load_raw_records(path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    let mut result = analyze_records(&raws, mode);
    result.metadata.source = Some(path.display().to_string());
    result.metadata.load_time_seconds = load_time;

    Ok(result)
}

/// Run normalization and aggregation on already-parsed rows.
pub fn analyze_records(raws: &[RawRecord], mode: NormalizeMode) -> AnalysisResult {
    let transform_start = Instant::now();

    let (records, report) = normalize_records_with(raws, mode);
    let by_app = SentimentAggregator::by_app(&records);
    let by_language = SentimentAggregator::by_language(&records);
    let summary = summary_statistics(&records);

    let transform_time = transform_start.elapsed().as_secs_f64();

    debug!(
        "Analyzed {} records: {} apps, {} languages",
        records.len(),
        by_app.len(),
        by_language.len()
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        source: None,
        rows_read: report.rows_seen,
        records_kept: report.kept,
        rows_dropped: report.rows_dropped(),
        invalid_fields: report.invalid_fields,
        strict: mode == NormalizeMode::Strict,
        load_time_seconds: 0.0,
        transform_time_seconds: transform_time,
    };

    AnalysisResult {
        records,
        by_app,
        by_language,
        summary,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
