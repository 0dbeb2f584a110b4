//! Reduction of annotated text to entity-label and lemma frequency tables.

use sense_core::models::FrequencyTable;
use sense_core::AnnotationError;
use tracing::debug;

use crate::annotation::{Annotator, Token};

/// Entity-label and content-lemma counts for one batch of texts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frequencies {
    /// Every entity mention counted under its label.
    pub entities: FrequencyTable,
    /// Lemmas of content tokens only (see [`is_content_token`]).
    pub lemmas: FrequencyTable,
}

/// Whether a token contributes to vocabulary counts: alphabetic, and neither
/// a stop word nor punctuation.
pub fn is_content_token(token: &Token) -> bool {
    token.is_alpha && !token.is_stop && !token.is_punct
}

/// Annotate `texts` in chunks of `batch_size` and count entity labels and
/// content lemmas across all of them.
///
/// Annotator failures are returned unchanged.
pub fn extract_frequencies<A>(
    annotator: &A,
    texts: &[&str],
    batch_size: usize,
) -> Result<Frequencies, AnnotationError>
where
    A: Annotator + ?Sized,
{
    let mut frequencies = Frequencies::default();

    for chunk in texts.chunks(batch_size.max(1)) {
        let docs = annotator.annotate_batch(chunk)?;
        if docs.len() != chunk.len() {
            return Err(AnnotationError::BatchMismatch {
                expected: chunk.len(),
                actual: docs.len(),
            });
        }

        for doc in &docs {
            for entity in &doc.entities {
                frequencies.entities.add(&entity.label);
            }
            for token in doc.tokens.iter().filter(|t| is_content_token(t)) {
                frequencies.lemmas.add(&token.lemma);
            }
        }
    }

    debug!(
        "Extracted {} entity labels and {} lemmas from {} texts",
        frequencies.entities.len(),
        frequencies.lemmas.len(),
        texts.len()
    );

    Ok(frequencies)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotatedDoc, Entity};
    use crate::heuristic::HeuristicAnnotator;
    use std::cell::RefCell;

    // ── Stubs ─────────────────────────────────────────────────────────────────

    fn token(lemma: &str, is_stop: bool, is_punct: bool, is_alpha: bool) -> Token {
        Token {
            text: lemma.to_string(),
            lemma: lemma.to_string(),
            is_stop,
            is_punct,
            is_alpha,
        }
    }

    fn entity(label: &str) -> Entity {
        Entity {
            text: label.to_lowercase(),
            label: label.to_string(),
        }
    }

    /// Returns the same document for every input and records batch sizes.
    struct FixedAnnotator {
        doc: AnnotatedDoc,
        batches: RefCell<Vec<usize>>,
    }

    impl FixedAnnotator {
        fn new(doc: AnnotatedDoc) -> Self {
            Self {
                doc,
                batches: RefCell::new(Vec::new()),
            }
        }
    }

    impl Annotator for FixedAnnotator {
        fn annotate_batch(&self, texts: &[&str]) -> Result<Vec<AnnotatedDoc>, AnnotationError> {
            self.batches.borrow_mut().push(texts.len());
            Ok(texts.iter().map(|_| self.doc.clone()).collect())
        }
    }

    struct FailingAnnotator;

    impl Annotator for FailingAnnotator {
        fn annotate_batch(&self, _texts: &[&str]) -> Result<Vec<AnnotatedDoc>, AnnotationError> {
            Err(AnnotationError::ModelUnavailable("weights missing".to_string()))
        }
    }

    struct ShortAnnotator;

    impl Annotator for ShortAnnotator {
        fn annotate_batch(&self, _texts: &[&str]) -> Result<Vec<AnnotatedDoc>, AnnotationError> {
            Ok(vec![AnnotatedDoc::default()])
        }
    }

    // ── filtering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_lemma_filter_excludes_stop_punct_and_non_alpha() {
        let doc = AnnotatedDoc {
            tokens: vec![
                token("river", false, false, true),
                token("the", true, false, true),
                token(",", false, true, false),
                token("2019", false, false, false),
                token("odd", false, true, true),
                token("river", false, false, true),
            ],
            entities: vec![],
        };
        let annotator = FixedAnnotator::new(doc);

        let freq = extract_frequencies(&annotator, &["x"], 100).unwrap();
        let lemmas: Vec<(&str, u64)> = freq.lemmas.iter().collect();
        assert_eq!(lemmas, vec![("river", 2)]);
    }

    #[test]
    fn test_stop_words_and_punctuation_only_yield_empty_lemmas() {
        let annotator = HeuristicAnnotator::new().unwrap();
        let freq = extract_frequencies(&annotator, &["And so, it was... the end?!"], 100).unwrap();
        assert!(freq.lemmas.contains("end"));

        let freq = extract_frequencies(&annotator, &["and so, it was... the?!"], 100).unwrap();
        assert!(freq.lemmas.is_empty());
    }

    // ── entity counting ───────────────────────────────────────────────────────

    #[test]
    fn test_every_entity_mention_counts() {
        let doc = AnnotatedDoc {
            tokens: vec![],
            entities: vec![entity("GPE"), entity("PERSON"), entity("GPE")],
        };
        let annotator = FixedAnnotator::new(doc);

        let freq = extract_frequencies(&annotator, &["a", "b"], 100).unwrap();
        assert_eq!(freq.entities.get("GPE"), 4);
        assert_eq!(freq.entities.get("PERSON"), 2);
    }

    // ── batching ──────────────────────────────────────────────────────────────

    #[test]
    fn test_texts_are_annotated_in_batches() {
        let annotator = FixedAnnotator::new(AnnotatedDoc::default());
        let texts = ["a"; 7];

        extract_frequencies(&annotator, &texts, 3).unwrap();
        assert_eq!(*annotator.batches.borrow(), vec![3, 3, 1]);
    }

    #[test]
    fn test_zero_batch_size_is_treated_as_one() {
        let annotator = FixedAnnotator::new(AnnotatedDoc::default());
        extract_frequencies(&annotator, &["a", "b"], 0).unwrap();
        assert_eq!(*annotator.batches.borrow(), vec![1, 1]);
    }

    #[test]
    fn test_empty_input_makes_no_calls() {
        let annotator = FixedAnnotator::new(AnnotatedDoc::default());
        let freq = extract_frequencies(&annotator, &[], 100).unwrap();
        assert!(annotator.batches.borrow().is_empty());
        assert_eq!(freq, Frequencies::default());
    }

    #[test]
    fn test_batch_size_does_not_change_counts() {
        let annotator = HeuristicAnnotator::new().unwrap();
        let texts = [
            "Long run along the river with @sam",
            "Rivers and more rivers. #running",
            "Coffee with Ada Lovelace",
        ];
        let one = extract_frequencies(&annotator, &texts, 1).unwrap();
        let all = extract_frequencies(&annotator, &texts, 100).unwrap();
        assert_eq!(one, all);
        assert_eq!(all.lemmas.get("river"), 3);
    }

    // ── failures ──────────────────────────────────────────────────────────────

    #[test]
    fn test_annotator_failure_propagates_unchanged() {
        let err = extract_frequencies(&FailingAnnotator, &["text"], 100).unwrap_err();
        assert_eq!(
            err,
            AnnotationError::ModelUnavailable("weights missing".to_string())
        );
    }

    #[test]
    fn test_short_batch_is_reported() {
        let err = extract_frequencies(&ShortAnnotator, &["a", "b"], 100).unwrap_err();
        assert_eq!(
            err,
            AnnotationError::BatchMismatch {
                expected: 2,
                actual: 1
            }
        );
    }
}
