//! Main analysis pipeline for Sense of Self.
//!
//! Chains parsing, normalization, yearly aggregation and report assembly,
//! returning an [`AnalysisResult`] ready for the presentation layer.

use std::path::Path;

use chrono::Utc;
use sense_core::models::{ArchiveCollection, ArchiveSummary, RawPost, YearReport};
use sense_core::{Result, SenseError};
use sense_nlp::Annotator;
use serde::Serialize;
use tracing::info;

use crate::aggregator::YearlyAggregator;
use crate::normalizer::{normalize, NormalizeStats};
use crate::reader::{load_archive, parse_archive};
use crate::report::ReportAssembler;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the reports.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// What normalization kept and dropped.
    pub normalize: NormalizeStats,
    /// Number of yearly reports produced.
    pub years_analyzed: usize,
    /// Posts handed to the annotator per call.
    pub batch_size: usize,
    /// Wall-clock seconds spent reading, parsing and normalizing.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent annotating and aggregating.
    pub analysis_time_seconds: f64,
}

/// The complete output of an analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub summary: ArchiveSummary,
    /// One report per year with posts, ascending.
    pub reports: Vec<YearReport>,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Read the archive at `path` and normalize it.
pub fn load_collection(path: &Path) -> Result<(ArchiveCollection, NormalizeStats)> {
    normalize(load_archive(path)?)
}

/// Run the full pipeline over the archive at `path`.
pub fn analyze_archive<A>(path: &Path, annotator: &A, batch_size: usize) -> Result<AnalysisResult>
where
    A: Annotator + ?Sized,
{
    let load_start = std::time::Instant::now();
    let raw = load_archive(path)?;
    run(raw, load_start, annotator, batch_size)
}

/// Run the full pipeline over an in-memory archive payload.
pub fn analyze_payload<A>(content: &str, annotator: &A, batch_size: usize) -> Result<AnalysisResult>
where
    A: Annotator + ?Sized,
{
    let load_start = std::time::Instant::now();
    let raw = parse_archive(content)?;
    run(raw, load_start, annotator, batch_size)
}

/// Aggregate and assemble reports for every year in `collection`.
pub fn build_reports<A>(
    collection: &ArchiveCollection,
    annotator: &A,
    batch_size: usize,
) -> Result<Vec<YearReport>>
where
    A: Annotator + ?Sized,
{
    let aggregator = YearlyAggregator::new(annotator, batch_size);
    aggregator
        .iter(collection)
        .map(|year| year.map(ReportAssembler::assemble))
        .collect()
}

// ── Internal ──────────────────────────────────────────────────────────────────

fn run<A>(
    raw: Vec<RawPost>,
    load_start: std::time::Instant,
    annotator: &A,
    batch_size: usize,
) -> Result<AnalysisResult>
where
    A: Annotator + ?Sized,
{
    let (collection, stats) = normalize(raw)?;
    let summary = collection.summary().ok_or(SenseError::EmptyArchive)?;
    let load_time = load_start.elapsed().as_secs_f64();

    let analysis_start = std::time::Instant::now();
    let reports = build_reports(&collection, annotator, batch_size)?;
    let analysis_time = analysis_start.elapsed().as_secs_f64();

    info!(
        "Analyzed {} posts across {} year(s) in {:.2}s",
        summary.total_posts,
        reports.len(),
        load_time + analysis_time
    );

    Ok(AnalysisResult {
        summary,
        metadata: AnalysisMetadata {
            generated_at: Utc::now().to_rfc3339(),
            normalize: stats,
            years_analyzed: reports.len(),
            batch_size: batch_size.max(1),
            load_time_seconds: load_time,
            analysis_time_seconds: analysis_time,
        },
        reports,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
