use chrono::{DateTime, Datelike, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// A post as extracted from the archive payload, before any validation.
///
/// Every field is optional here; the normalizer decides which records survive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPost {
    /// Identifier as found in the export (integers are stringified).
    pub id: Option<String>,
    /// Unparsed creation timestamp.
    pub created_at: Option<String>,
    /// Body text, `full_text` preferred over `text`.
    pub text: Option<String>,
}

/// One validated post with a UTC creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Identifier, unique within an [`ArchiveCollection`].
    pub id: String,
    /// UTC timestamp the post was created at.
    pub created_at: DateTime<Utc>,
    /// Body text of the post.
    pub text: String,
}

// ── ArchiveCollection ─────────────────────────────────────────────────────────

/// Chronologically ordered set of posts with unique ids.
///
/// Posts are sorted by `(created_at, id)` on construction, so each calendar
/// year occupies one contiguous slice. Lookup by id goes through an index
/// built alongside.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveCollection {
    posts: Vec<PostRecord>,
    by_id: HashMap<String, usize>,
}

impl ArchiveCollection {
    /// Build a collection from posts whose ids are already unique.
    pub fn new(mut posts: Vec<PostRecord>) -> Self {
        posts.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        let by_id = posts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        Self { posts, by_id }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// All posts, oldest first.
    pub fn posts(&self) -> &[PostRecord] {
        &self.posts
    }

    /// Look up a post by id.
    pub fn get(&self, id: &str) -> Option<&PostRecord> {
        self.by_id.get(id).map(|&i| &self.posts[i])
    }

    /// Distinct calendar years that contain at least one post, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.posts.iter().map(|p| p.created_at.year()).collect();
        years.dedup();
        years
    }

    /// Posts created within `year`, oldest first. Empty when the year has none.
    pub fn year_bucket(&self, year: i32) -> &[PostRecord] {
        let start = self.posts.partition_point(|p| p.created_at.year() < year);
        let end = self.posts.partition_point(|p| p.created_at.year() <= year);
        &self.posts[start..end]
    }

    /// Post count and date range, or `None` for an empty collection.
    pub fn summary(&self) -> Option<ArchiveSummary> {
        let first = self.posts.first()?;
        let last = self.posts.last()?;
        Some(ArchiveSummary {
            total_posts: self.posts.len(),
            first_post: first.created_at,
            last_post: last.created_at,
        })
    }
}

/// Headline numbers for a whole archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveSummary {
    pub total_posts: usize,
    pub first_post: DateTime<Utc>,
    pub last_post: DateTime<Utc>,
}

// ── FrequencyTable ────────────────────────────────────────────────────────────

/// Label → occurrence count, remembering the order labels were first seen.
///
/// Iteration and serialization follow first-seen order, which is also the
/// tie-break used by [`FrequencyTable::ranked`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `label`.
    pub fn add(&mut self, label: &str) {
        self.add_count(label, 1);
    }

    /// Count `count` occurrences of `label`.
    pub fn add_count(&mut self, label: &str, count: u64) {
        match self.index.get(label) {
            Some(&i) => self.entries[i].1 += count,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), count));
            }
        }
    }

    /// Fold `other` into `self`; labels new to `self` keep `other`'s order.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (label, count) in other.iter() {
            self.add_count(label, count);
        }
    }

    /// Count for `label`, zero when absent.
    pub fn get(&self, label: &str) -> u64 {
        self.index.get(label).map_or(0, |&i| self.entries[i].1)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// All entries sorted by descending count; equal counts keep first-seen order.
    pub fn ranked(&self) -> Vec<RankedLabel> {
        let mut ranked: Vec<RankedLabel> = self
            .entries
            .iter()
            .map(|(label, count)| RankedLabel {
                label: label.clone(),
                count: *count,
            })
            .collect();
        // sort_by is stable, so ties stay in first-seen order.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}

impl<S: AsRef<str>> FromIterator<S> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for label in iter {
            table.add(label.as_ref());
        }
        table
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, count) in &self.entries {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

// ── Report types ──────────────────────────────────────────────────────────────

/// A label with its count, as listed in a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedLabel {
    pub label: String,
    pub count: u64,
}

/// Number of posts within one calendar month (1 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    pub month: u32,
    pub count: u32,
}

/// Everything reported for a single calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearReport {
    pub year: i32,
    /// Always twelve entries, January through December, zero-filled.
    pub monthly_counts: Vec<MonthCount>,
    /// At most ten entity labels, most frequent first.
    pub top_entities: Vec<RankedLabel>,
    /// Full lemma table in first-seen order.
    pub lemma_frequencies: FrequencyTable,
}

impl YearReport {
    /// Total posts across the year's months.
    pub fn total_posts(&self) -> u32 {
        self.monthly_counts.iter().map(|m| m.count).sum()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
