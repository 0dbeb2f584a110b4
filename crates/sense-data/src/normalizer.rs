//! Validation of raw posts into a time-indexed [`ArchiveCollection`].

use std::collections::HashMap;

use sense_core::models::{ArchiveCollection, PostRecord, RawPost};
use sense_core::time_utils::TimestampProcessor;
use sense_core::{Result, SenseError};
use tracing::{debug, info};

/// Per-run counts of what normalization kept and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct NormalizeStats {
    /// Raw posts handed in.
    pub raw_records: usize,
    /// Posts dropped for lacking an id or text.
    pub missing_fields: usize,
    /// Posts dropped because the timestamp was absent or unparseable.
    pub bad_timestamps: usize,
    /// Earlier posts replaced by a later post with the same id.
    pub duplicates: usize,
}

impl NormalizeStats {
    /// Total posts not present in the resulting collection.
    pub fn dropped(&self) -> usize {
        self.missing_fields + self.bad_timestamps + self.duplicates
    }
}

/// Coerce, validate and deduplicate `raw` posts.
///
/// Posts without an id or text, or whose timestamp cannot be parsed, are
/// dropped. When ids repeat, the last one seen wins. Fails with
/// [`SenseError::EmptyArchive`] if nothing survives.
pub fn normalize(raw: Vec<RawPost>) -> Result<(ArchiveCollection, NormalizeStats)> {
    let mut stats = NormalizeStats {
        raw_records: raw.len(),
        ..NormalizeStats::default()
    };

    let mut posts: Vec<PostRecord> = Vec::with_capacity(raw.len());
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for record in raw {
        let (Some(id), Some(text)) = (record.id, record.text) else {
            stats.missing_fields += 1;
            continue;
        };

        let Some(created_at) = record.created_at.as_deref().and_then(TimestampProcessor::parse)
        else {
            debug!("Dropping post {}: unparseable timestamp {:?}", id, record.created_at);
            stats.bad_timestamps += 1;
            continue;
        };

        let post = PostRecord {
            id,
            created_at,
            text,
        };

        match by_id.get(&post.id) {
            Some(&slot) => {
                debug!("Duplicate post id {}; keeping the later record", post.id);
                stats.duplicates += 1;
                posts[slot] = post;
            }
            None => {
                by_id.insert(post.id.clone(), posts.len());
                posts.push(post);
            }
        }
    }

    if posts.is_empty() {
        return Err(SenseError::EmptyArchive);
    }

    info!(
        "Normalized {} posts ({} dropped of {})",
        posts.len(),
        stats.dropped(),
        stats.raw_records
    );

    Ok((ArchiveCollection::new(posts), stats))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
