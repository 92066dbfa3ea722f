use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::models::NormalizeMode;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Sentiment and summary statistics for app-store review exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "review-analyzer",
    about = "Sentiment and summary statistics for app-store review exports",
    version
)]
pub struct Settings {
    /// CSV file, or directory of CSV files, to analyze
    #[arg(env = "REVIEW_INPUT")]
    pub input: PathBuf,

    /// Report section to print
    #[arg(long, default_value = "all", value_parser = ["all", "app", "language", "summary", "records"])]
    pub view: String,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Drop rows whose numeric or date cells cannot be parsed
    #[arg(long)]
    pub strict: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Logging level
    #[arg(
        long,
        env = "REVIEW_LOG_LEVEL",
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]
    )]
    pub log_level: String,

    /// Also append log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply overrides.
    pub fn load() -> Self {
        Self::parse().resolve()
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn try_load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::try_parse_from(args)?.resolve())
    }

    /// Apply the `--debug` override to the log level.
    pub fn resolve(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }

    pub fn normalize_mode(&self) -> NormalizeMode {
        if self.strict {
            NormalizeMode::Strict
        } else {
            NormalizeMode::BestEffort
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
