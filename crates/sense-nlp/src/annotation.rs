use sense_core::AnnotationError;

/// One token of annotated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface form as it appears in the text.
    pub text: String,
    /// Canonical dictionary form.
    pub lemma: String,
    pub is_stop: bool,
    pub is_punct: bool,
    pub is_alpha: bool,
}

/// A named-entity span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub text: String,
    /// Entity type, e.g. `NAME` or `HASHTAG`.
    pub label: String,
}

/// Annotation result for one input string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedDoc {
    pub tokens: Vec<Token>,
    pub entities: Vec<Entity>,
}

/// A linguistic annotation capability.
///
/// Implementations must return exactly one [`AnnotatedDoc`] per input, in
/// input order, and must not mutate shared state while annotating.
pub trait Annotator {
    fn annotate_batch(&self, texts: &[&str]) -> Result<Vec<AnnotatedDoc>, AnnotationError>;
}
