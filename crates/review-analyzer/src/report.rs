use std::fmt::{self, Display, Write};

use review_core::formatting::{format_count, format_rating, percentage};
use review_core::models::{Coerced, NormalizedRecord};
use review_core::sentiment::label_sentiment;
use review_core::settings::Settings;
use review_data::aggregator::{SentimentAggregator, SentimentCounts};
use review_data::analysis::{AnalysisMetadata, AnalysisResult};
use review_data::summary::SummaryStatistics;
use serde::Serialize;

// ── Entry point ────────────────────────────────────────────────────────────────

/// Render the section selected by `settings.view` in `settings.format`.
pub fn render(result: &AnalysisResult, settings: &Settings) -> anyhow::Result<String> {
    if settings.is_json() {
        render_json(result, &settings.view, settings.pretty)
    } else {
        Ok(render_text(result, &settings.view)?)
    }
}

// ── JSON ───────────────────────────────────────────────────────────────────────

pub fn render_json(result: &AnalysisResult, view: &str, pretty: bool) -> anyhow::Result<String> {
    match view {
        "app" => to_json(&result.by_app, pretty),
        "language" => to_json(&result.by_language, pretty),
        "summary" => to_json(&result.summary, pretty),
        "records" => to_json(&result.records, pretty),
        _ => to_json(&result.report(), pretty),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

// ── Text ───────────────────────────────────────────────────────────────────────

const TOTAL_LABEL: &str = "Total";

pub fn render_text(result: &AnalysisResult, view: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    match view {
        "app" => write_app_table(&mut out, result)?,
        "language" => write_language_table(&mut out, result)?,
        "summary" => write_summary(&mut out, &result.summary)?,
        "records" => write_records(&mut out, &result.records)?,
        _ => {
            write_app_table(&mut out, result)?;
            writeln!(out)?;
            write_language_table(&mut out, result)?;
            writeln!(out)?;
            write_summary(&mut out, &result.summary)?;
            writeln!(out)?;
            write_metadata(&mut out, &result.metadata)?;
        }
    }
    Ok(out)
}

fn write_app_table(out: &mut String, result: &AnalysisResult) -> fmt::Result {
    write_sentiment_table(
        out,
        "Sentiment by app",
        "App",
        result.by_app.iter().map(|a| (a.app_name.as_str(), &a.counts)),
    )
}

fn write_language_table(out: &mut String, result: &AnalysisResult) -> fmt::Result {
    write_sentiment_table(
        out,
        "Sentiment by language",
        "Language",
        result
            .by_language
            .iter()
            .map(|l| (l.review_language.as_str(), &l.counts)),
    )
}

fn write_sentiment_table<'a>(
    out: &mut String,
    title: &str,
    key_header: &str,
    rows: impl Iterator<Item = (&'a str, &'a SentimentCounts)>,
) -> fmt::Result {
    let rows: Vec<(&str, &SentimentCounts)> = rows.collect();
    let width = rows
        .iter()
        .map(|(key, _)| key.chars().count())
        .chain([key_header.len(), TOTAL_LABEL.len()])
        .max()
        .unwrap_or(0);

    writeln!(out, "{title}")?;
    if rows.is_empty() {
        return writeln!(out, "  (no reviews)");
    }

    writeln!(
        out,
        "  {:<width$}  {:>9}  {:>9}  {:>9}  {:>9}  {:>7}",
        key_header, "Positive", "Neutral", "Negative", "Total", "% pos",
    )?;
    for (key, counts) in &rows {
        write_counts_row(out, key, counts, width)?;
    }

    let totals = SentimentAggregator::totals(rows.iter().map(|(_, counts)| *counts));
    write_counts_row(out, TOTAL_LABEL, &totals, width)
}

fn write_counts_row(
    out: &mut String,
    key: &str,
    counts: &SentimentCounts,
    width: usize,
) -> fmt::Result {
    let total = counts.total();
    writeln!(
        out,
        "  {:<width$}  {:>9}  {:>9}  {:>9}  {:>9}  {:>6.1}%",
        key,
        format_count(counts.positive),
        format_count(counts.neutral),
        format_count(counts.negative),
        format_count(total),
        percentage(counts.positive as f64, total as f64, 1),
    )
}

fn write_summary(out: &mut String, summary: &SummaryStatistics) -> fmt::Result {
    writeln!(out, "Summary")?;
    match summary.most_reviewed_app.as_deref() {
        Some(app) => writeln!(
            out,
            "  Most reviewed app: {} ({} reviews)",
            app,
            format_count(summary.most_reviews)
        )?,
        None => writeln!(out, "  Most reviewed app: n/a")?,
    }
    match summary.most_used_device.as_deref() {
        Some(device) => writeln!(
            out,
            "  Most used device:  {} ({} reviews)",
            device,
            format_count(summary.most_devices)
        )?,
        None => writeln!(out, "  Most used device:  n/a")?,
    }
    writeln!(out, "  Average rating:    {}", format_rating(summary.avg_rating))
}

fn write_metadata(out: &mut String, metadata: &AnalysisMetadata) -> fmt::Result {
    writeln!(
        out,
        "Rows: {} read, {} kept, {} dropped, {} invalid cells{}",
        format_count(metadata.rows_read as u64),
        format_count(metadata.records_kept as u64),
        format_count(metadata.rows_dropped as u64),
        format_count(metadata.invalid_fields as u64),
        if metadata.strict { " (strict)" } else { "" },
    )
}

fn write_records(out: &mut String, records: &[NormalizedRecord]) -> fmt::Result {
    writeln!(
        out,
        "{:>8}  {:<20}  {:<8}  {:<10}  {:>6}  {:<8}  {:<10}",
        "ID", "App", "Language", "Date", "Rating", "Label", "Device"
    )?;
    for record in records {
        writeln!(
            out,
            "{:>8}  {:<20}  {:<8}  {:<10}  {:>6}  {:<8}  {:<10}",
            cell(&record.review_id),
            record.app_name,
            record.review_language,
            cell(&record.review_date),
            format_rating(record.rating_value()),
            label_sentiment(record.rating_value()).as_str(),
            record.device_type,
        )?;
    }
    Ok(())
}

/// Display a coerced cell, falling back to the raw text in brackets.
fn cell<T: Display>(value: &Coerced<T>) -> String {
    match value.value() {
        Some(v) => v.to_string(),
        None => format!("[{}]", value.invalid_raw().unwrap_or_default()),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::models::{NormalizeMode, RawRecord};
    use review_data::analysis::analyze_records;

    fn raw(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_result() -> AnalysisResult {
        let rows = vec![
            raw(&[
                ("review_id", "1"),
                ("app_name", "A"),
                ("review_language", "en"),
                ("device_type", "phone"),
                ("review_date", "2020-01-01"),
                ("rating", "4.5"),
                ("verified_purchase", "TRUE"),
                ("num_helpful_votes", "0"),
                ("user_id", "1"),
                ("user_age", "30"),
                ("user_country", "US"),
                ("user_gender", "M"),
            ]),
            raw(&[
                ("review_id", "2"),
                ("app_name", "A"),
                ("review_language", "de"),
                ("device_type", "tablet"),
                ("review_date", "soon"),
                ("rating", "1"),
                ("verified_purchase", "false"),
                ("num_helpful_votes", "0"),
                ("user_id", "2"),
                ("user_age", "22"),
                ("user_country", "DE"),
                ("user_gender", ""),
            ]),
        ];
        analyze_records(&rows, NormalizeMode::BestEffort)
    }

    // ── JSON ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_json_summary_view() {
        let json = render_json(&sample_result(), "summary", false).unwrap();
        assert_eq!(
            json,
            r#"{"mostReviewedApp":"A","mostReviews":2,"mostUsedDevice":"phone","mostDevices":1,"avgRating":2.75}"#
        );
    }

    #[test]
    fn test_render_json_all_view_has_sections() {
        let json = render_json(&sample_result(), "all", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["by_app"][0]["app_name"], "A");
        assert_eq!(value["by_language"].as_array().unwrap().len(), 2);
        assert_eq!(value["metadata"]["records_kept"], 2);
        assert!(value.get("records").is_none());
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_render_json_records_nest_user() {
        let json = render_json(&sample_result(), "records", false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["user"]["user_country"], "US");
        assert!(value[0].get("user_country").is_none());
        assert_eq!(value[1]["review_date"], serde_json::Value::Null);
    }

    // ── Text ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_text_all_view() {
        let text = render_text(&sample_result(), "all").unwrap();

        assert!(text.contains("Sentiment by app"));
        assert!(text.contains("Sentiment by language"));
        assert!(text.contains("Most reviewed app: A (2 reviews)"));
        assert!(text.contains("Most used device:  phone (1 reviews)"));
        assert!(text.contains("Average rating:    2.75"));
        assert!(text.contains("Rows: 2 read, 2 kept, 0 dropped, 1 invalid cells"));
    }

    #[test]
    fn test_render_text_app_view_only() {
        let text = render_text(&sample_result(), "app").unwrap();

        assert!(text.starts_with("Sentiment by app\n"));
        assert!(!text.contains("Summary"));
        assert!(text.contains("50.0%"));
    }

    #[test]
    fn test_render_text_table_ends_with_totals_row() {
        let text = render_text(&sample_result(), "language").unwrap();
        let last = text.lines().last().unwrap();

        assert_eq!(
            last.split_whitespace().collect::<Vec<_>>(),
            vec!["Total", "1", "0", "1", "2", "50.0%"]
        );
        assert_eq!(text.lines().filter(|l| l.trim_start().starts_with("Total")).count(), 1);
    }

    #[test]
    fn test_render_text_empty_result() {
        let empty = analyze_records(&[], NormalizeMode::BestEffort);
        let text = render_text(&empty, "all").unwrap();

        assert!(text.contains("(no reviews)"));
        assert!(text.contains("Most reviewed app: n/a"));
        assert!(text.contains("Average rating:    n/a"));
    }

    #[test]
    fn test_render_text_records_show_invalid_raw() {
        let text = render_text(&sample_result(), "records").unwrap();

        assert!(text.contains("2020-01-01"));
        assert!(text.contains("[soon]"));
        assert!(text.contains("positive"));
        assert!(text.contains("negative"));
    }
}
