mod bootstrap;
mod render;

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use sense_core::settings::{OutputFormat, Settings};
use sense_data::aggregator::YearlyAggregator;
use sense_data::analysis::{analyze_archive, load_collection};
use sense_data::report::ReportAssembler;
use sense_nlp::shared_annotator;

fn main() -> ExitCode {
    let settings = Settings::load();

    if let Err(e) = bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref()) {
        eprintln!("Failed to initialise logging: {e:#}");
        return ExitCode::FAILURE;
    }

    tracing::info!("Sense of Self v{} starting", env!("CARGO_PKG_VERSION"));

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("An error occurred while processing the archive: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(settings: &Settings) -> Result<()> {
    settings.validate()?;

    let archive = match &settings.archive {
        Some(path) => path.clone(),
        None => bootstrap::discover_archive_path().context(
            "no archive given and none found in ./tweets.js, ./data/tweets.js \
             or ~/twitter-archive/data/tweets.js",
        )?,
    };
    tracing::info!("Reading archive from {}", archive.display());

    let annotator = shared_annotator()?;
    let batch_size = settings.batch_size as usize;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match settings.format {
        OutputFormat::Json => {
            let result = analyze_archive(&archive, annotator, batch_size)?;
            let json = serde_json::to_string_pretty(&result)?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Text => {
            let (collection, stats) = load_collection(&archive)?;
            if stats.dropped() > 0 {
                tracing::warn!(
                    "{} of {} posts were skipped during normalization",
                    stats.dropped(),
                    stats.raw_records
                );
            }
            if let Some(summary) = collection.summary() {
                write!(out, "{}", render::render_summary(&summary))?;
            }

            // Each year is rendered as soon as it is analysed.
            let aggregator = YearlyAggregator::new(annotator, batch_size);
            for year in aggregator.iter(&collection) {
                let report = ReportAssembler::assemble(year?);
                write!(
                    out,
                    "{}",
                    render::render_year(&report, settings.vocabulary_limit)
                )?;
                out.flush()?;
            }
        }
    }

    Ok(())
}
