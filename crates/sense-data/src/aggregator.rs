//! Per-year aggregation: monthly post counts plus entity and lemma tables.

use chrono::Datelike;
use sense_core::models::{ArchiveCollection, FrequencyTable, MonthCount, PostRecord};
use sense_core::Result;
use sense_nlp::{extract_frequencies, Annotator};
use tracing::{debug, info};

/// Everything computed for one calendar year before report assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearAggregate {
    pub year: i32,
    /// Twelve entries, January first, zero-filled.
    pub monthly_counts: Vec<MonthCount>,
    pub entities: FrequencyTable,
    pub lemmas: FrequencyTable,
}

/// Count `posts` per calendar month. Always returns twelve entries.
pub fn monthly_counts(posts: &[PostRecord]) -> Vec<MonthCount> {
    let mut counts = [0u32; 12];
    for post in posts {
        counts[post.created_at.month0() as usize] += 1;
    }
    counts
        .iter()
        .zip(1u32..)
        .map(|(&count, month)| MonthCount { month, count })
        .collect()
}

// ── YearlyAggregator ──────────────────────────────────────────────────────────

/// Partitions a collection by calendar year and analyses each year's posts
/// with a shared [`Annotator`].
pub struct YearlyAggregator<'a, A: ?Sized> {
    annotator: &'a A,
    batch_size: usize,
}

impl<'a, A> YearlyAggregator<'a, A>
where
    A: Annotator + ?Sized,
{
    pub fn new(annotator: &'a A, batch_size: usize) -> Self {
        Self {
            annotator,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Aggregate a single year. A year without posts yields zero counts and
    /// empty tables without calling the annotator.
    pub fn aggregate_year(
        &self,
        collection: &ArchiveCollection,
        year: i32,
    ) -> Result<YearAggregate> {
        let bucket = collection.year_bucket(year);
        let texts: Vec<&str> = bucket.iter().map(|p| p.text.as_str()).collect();

        debug!("Year {}: annotating {} posts", year, texts.len());
        let frequencies = extract_frequencies(self.annotator, &texts, self.batch_size)?;

        Ok(YearAggregate {
            year,
            monthly_counts: monthly_counts(bucket),
            entities: frequencies.entities,
            lemmas: frequencies.lemmas,
        })
    }

    /// Lazily aggregate every year present in `collection`, ascending.
    ///
    /// Each year is analysed only when the iterator reaches it, so a caller
    /// can render one year before paying for the next.
    pub fn iter<'c>(&'c self, collection: &'c ArchiveCollection) -> YearIter<'c, 'a, A> {
        YearIter {
            aggregator: self,
            collection,
            years: collection.years().into_iter(),
        }
    }

    /// Aggregate every year present in `collection`, stopping at the first error.
    pub fn aggregate(&self, collection: &ArchiveCollection) -> Result<Vec<YearAggregate>> {
        let years = self.iter(collection).collect::<Result<Vec<_>>>()?;
        info!("Aggregated {} year(s)", years.len());
        Ok(years)
    }
}

/// Iterator returned by [`YearlyAggregator::iter`].
pub struct YearIter<'c, 'a, A: ?Sized> {
    aggregator: &'c YearlyAggregator<'a, A>,
    collection: &'c ArchiveCollection,
    years: std::vec::IntoIter<i32>,
}

impl<A> Iterator for YearIter<'_, '_, A>
where
    A: Annotator + ?Sized,
{
    type Item = Result<YearAggregate>;

    fn next(&mut self) -> Option<Self::Item> {
        let year = self.years.next()?;
        Some(self.aggregator.aggregate_year(self.collection, year))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
