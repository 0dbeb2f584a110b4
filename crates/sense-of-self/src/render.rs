//! Plain-text rendering of archive summaries and yearly reports.

use std::fmt::Write as _;

use sense_core::models::{ArchiveSummary, YearReport};
use unicode_width::UnicodeWidthStr;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Widest bar drawn in the posting-rhythm chart.
const BAR_WIDTH: u32 = 40;

/// Pad `s` with spaces to `width` terminal columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    let mut out = s.to_string();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(w)));
    out
}

/// Headline totals for the whole archive.
pub fn render_summary(summary: &ArchiveSummary) -> String {
    format!(
        "Your Archive Journey\nTotal posts: {}\nDate range: {} to {}\n",
        summary.total_posts,
        summary.first_post.format("%Y-%m-%d"),
        summary.last_post.format("%Y-%m-%d"),
    )
}

/// One year: posting rhythm, top subjects and the `vocabulary_limit` most
/// frequent lemmas.
pub fn render_year(report: &YearReport, vocabulary_limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n== Your {} in posts ({}) ==", report.year, report.total_posts());

    let _ = writeln!(out, "\nPosting rhythm");
    let peak = report
        .monthly_counts
        .iter()
        .map(|m| m.count)
        .max()
        .unwrap_or(0)
        .max(1);
    for month in &report.monthly_counts {
        let name = MONTH_NAMES
            .get(month.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("???");
        let bar_len = (u64::from(month.count) * u64::from(BAR_WIDTH)).div_ceil(u64::from(peak));
        let bar = "█".repeat(bar_len as usize);
        let _ = writeln!(out, "  {} {:>5} {}", name, month.count, bar);
    }

    let _ = writeln!(out, "\nTop subjects");
    if report.top_entities.is_empty() {
        let _ = writeln!(out, "  (none)");
    } else {
        let width = report
            .top_entities
            .iter()
            .map(|e| UnicodeWidthStr::width(e.label.as_str()))
            .max()
            .unwrap_or(0);
        for entity in &report.top_entities {
            let _ = writeln!(out, "  {} {:>5}", pad_to_width(&entity.label, width), entity.count);
        }
    }

    let _ = writeln!(out, "\nVocabulary");
    let vocabulary: Vec<_> = report
        .lemma_frequencies
        .ranked()
        .into_iter()
        .take(vocabulary_limit)
        .collect();
    if vocabulary.is_empty() {
        let _ = writeln!(out, "  (none)");
    } else {
        let width = vocabulary
            .iter()
            .map(|w| UnicodeWidthStr::width(w.label.as_str()))
            .max()
            .unwrap_or(0);
        for word in &vocabulary {
            let _ = writeln!(out, "  {} {:>5}", pad_to_width(&word.label, width), word.count);
        }
    }

    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
