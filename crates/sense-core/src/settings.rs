use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::{Result, SenseError};

/// How the reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Yearly posting rhythm, subjects and vocabulary from a social-media archive
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sense-of-self",
    about = "Yearly posting rhythm, subjects and vocabulary from a social-media archive",
    version
)]
pub struct Settings {
    /// Archive file (tweets.js) or export directory; discovered when omitted
    #[arg(env = "SENSE_ARCHIVE")]
    pub archive: Option<PathBuf>,

    /// Number of posts annotated per batch (1-10000)
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u32).range(1..=10_000))]
    pub batch_size: u32,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Number of vocabulary words listed per year in text output
    #[arg(long, default_value_t = 30)]
    pub vocabulary_limit: usize,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path (logs go to stderr otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply `--debug`.
    pub fn load() -> Self {
        Self::from_args(std::env::args_os())
    }

    /// Same as [`load`](Self::load) with an explicit argument list.
    pub fn from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Reject an explicitly given archive path that does not exist.
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.archive {
            if !path.exists() {
                return Err(SenseError::Config(format!(
                    "archive path does not exist: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
