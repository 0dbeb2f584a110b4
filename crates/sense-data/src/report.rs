//! Packaging of yearly aggregates into presentation-ready reports.

use sense_core::models::{FrequencyTable, RankedLabel, YearReport};

use crate::aggregator::YearAggregate;

/// Maximum number of entity labels listed in a report.
pub const TOP_ENTITY_LIMIT: usize = 10;

/// Stateless helper that turns [`YearAggregate`]s into [`YearReport`]s.
pub struct ReportAssembler;

impl ReportAssembler {
    /// Build the report for one year. The lemma table is passed through whole;
    /// choosing how much vocabulary to show is up to the presentation layer.
    pub fn assemble(aggregate: YearAggregate) -> YearReport {
        YearReport {
            year: aggregate.year,
            top_entities: Self::top_entities(&aggregate.entities, TOP_ENTITY_LIMIT),
            monthly_counts: aggregate.monthly_counts,
            lemma_frequencies: aggregate.lemmas,
        }
    }

    /// The `limit` most frequent labels, descending by count. Labels with equal
    /// counts keep the order in which they were first counted.
    pub fn top_entities(table: &FrequencyTable, limit: usize) -> Vec<RankedLabel> {
        let mut ranked = table.ranked();
        ranked.truncate(limit);
        ranked
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::monthly_counts;

    fn aggregate(entities: FrequencyTable, lemmas: FrequencyTable) -> YearAggregate {
        YearAggregate {
            year: 2020,
            monthly_counts: monthly_counts(&[]),
            entities,
            lemmas,
        }
    }

    #[test]
    fn test_top_entities_bounded_to_ten() {
        let mut table = FrequencyTable::new();
        for (i, label) in ('A'..='M').enumerate() {
            table.add_count(&label.to_string(), (i + 1) as u64);
        }
        assert_eq!(table.len(), 13);

        let report = ReportAssembler::assemble(aggregate(table, FrequencyTable::new()));
        assert_eq!(report.top_entities.len(), TOP_ENTITY_LIMIT);
        assert_eq!(report.top_entities[0].label, "M");
        assert_eq!(report.top_entities[0].count, 13);
        assert!(report
            .top_entities
            .windows(2)
            .all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_top_entities_fewer_than_limit() {
        let table: FrequencyTable = ["NAME", "HASHTAG", "NAME"].into_iter().collect();
        let report = ReportAssembler::assemble(aggregate(table, FrequencyTable::new()));
        assert_eq!(report.top_entities.len(), 2);
        assert_eq!(report.top_entities[0].label, "NAME");
    }

    #[test]
    fn test_top_entities_tie_break_is_first_seen() {
        let table: FrequencyTable = ["HASHTAG", "ORG", "HANDLE", "ORG", "HANDLE", "HASHTAG"]
            .into_iter()
            .collect();
        let labels: Vec<String> = ReportAssembler::top_entities(&table, 10)
            .into_iter()
            .map(|r| r.label)
            .collect();
        assert_eq!(labels, vec!["HASHTAG", "ORG", "HANDLE"]);
    }

    #[test]
    fn test_lemmas_passed_through_unabridged() {
        let lemmas: FrequencyTable = (0..250).map(|i| format!("word{i}")).collect();
        let report = ReportAssembler::assemble(aggregate(FrequencyTable::new(), lemmas.clone()));
        assert_eq!(report.lemma_frequencies, lemmas);
        assert!(report.top_entities.is_empty());
    }

    #[test]
    fn test_monthly_counts_carried_over() {
        let report =
            ReportAssembler::assemble(aggregate(FrequencyTable::new(), FrequencyTable::new()));
        assert_eq!(report.year, 2020);
        assert_eq!(report.monthly_counts.len(), 12);
    }
}
