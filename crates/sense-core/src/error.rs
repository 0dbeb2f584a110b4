use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by a linguistic annotation capability.
///
/// Kept separate from [`SenseError`] so annotator implementations do not
/// depend on the pipeline's error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    /// The annotator refused a piece of input text.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// The annotator returned a different number of documents than it was given.
    #[error("Annotator returned {actual} documents for a batch of {expected}")]
    BatchMismatch { expected: usize, actual: usize },

    /// The underlying model could not be used.
    #[error("Annotation model unavailable: {0}")]
    ModelUnavailable(String),
}

/// All errors produced by the Sense of Self pipeline.
#[derive(Error, Debug)]
pub enum SenseError {
    /// The payload is not an assignment-wrapped JSON array of posts.
    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    /// The payload parsed but no post survived timestamp coercion.
    #[error("Archive contains no usable posts")]
    EmptyArchive,

    /// The annotation capability failed; passed through untouched.
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No archive files were found under the given directory.
    #[error("No archive files found in {0}")]
    NoArchiveFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the Sense of Self crates.
pub type Result<T> = std::result::Result<T, SenseError>;
