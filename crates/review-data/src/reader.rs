//! CSV discovery and loading for review exports.
//!
//! Turns a CSV file, or every `.csv` file under a directory, into
//! [`RawRecord`]s keyed by header name. Cell text is passed through
//! untouched; filtering and typing happen in the normalizer.

use std::io::Read;
use std::path::{Path, PathBuf};

use review_core::error::{Result, ReviewError};
use review_core::models::{RawRecord, REQUIRED_COLUMNS};
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `data_path`, sorted by path.
pub fn find_csv_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Fail with [`ReviewError::MissingColumn`] unless every review column is
/// present in `headers`.
pub fn validate_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let present: Vec<&str> = headers.into_iter().map(str::trim).collect();
    match REQUIRED_COLUMNS
        .iter()
        .find(|column| !present.contains(*column))
    {
        Some(missing) => Err(ReviewError::MissingColumn((*missing).to_string())),
        None => Ok(()),
    }
}

/// Parse CSV text with a header row into raw records.
///
/// Short rows leave their trailing columns absent from the record.
pub fn read_raw_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    validate_headers(headers.iter().map(String::as_str))?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();
        records.push(record);
    }

    Ok(records)
}

/// Load one CSV file.
pub fn load_csv_file(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path).map_err(|source| ReviewError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records = read_raw_records(std::io::BufReader::new(file))?;

    debug!("File {}: {} rows read", path.display(), records.len());

    Ok(records)
}

/// Load raw records from a CSV file, or from every CSV file under a
/// directory (concatenated in path order).
pub fn load_raw_records(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(ReviewError::InputNotFound(path.to_path_buf()));
    }

    if path.is_file() {
        return load_csv_file(path);
    }

    let files = find_csv_files(path);
    if files.is_empty() {
        return Err(ReviewError::NoDataFiles(path.to_path_buf()));
    }

    let mut all_records = Vec::new();
    for file in &files {
        all_records.extend(load_csv_file(file)?);
    }

    debug!(
        "Loaded {} rows from {} files under {}",
        all_records.len(),
        files.len(),
        path.display()
    );

    Ok(all_records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
