//! Linguistic layer for Sense of Self.
//!
//! Defines the [`Annotator`](annotation::Annotator) seam consumed by the
//! pipeline, a rule-based implementation shared process-wide, and the
//! extractor that reduces annotations to entity and lemma frequency tables.

pub mod annotation;
pub mod extractor;
pub mod heuristic;
mod stopwords;

pub use annotation::{AnnotatedDoc, Annotator, Entity, Token};
pub use extractor::{extract_frequencies, Frequencies};
pub use heuristic::{shared_annotator, HeuristicAnnotator};
