mod bootstrap;
mod report;

use anyhow::Result;
use review_core::settings::Settings;
use review_data::analysis::analyze_reviews;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("Review Analyzer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Input: {}, View: {}, Format: {}, Strict: {}",
        settings.input.display(),
        settings.view,
        settings.format,
        settings.strict
    );

    let result = analyze_reviews(&settings.input, settings.normalize_mode())?;

    tracing::info!(
        "Kept {} of {} rows ({} dropped, {} invalid cells) in {:.3}s",
        result.metadata.records_kept,
        result.metadata.rows_read,
        result.metadata.rows_dropped,
        result.metadata.invalid_fields,
        result.metadata.load_time_seconds + result.metadata.transform_time_seconds
    );

    let output = report::render(&result, &settings)?;
    print!("{}", output);
    if settings.is_json() {
        println!();
    }

    Ok(())
}
