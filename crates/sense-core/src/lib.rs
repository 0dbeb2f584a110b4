//! Shared building blocks for Sense of Self.
//!
//! Holds the canonical post and report types, the error taxonomy, timestamp
//! coercion for archive exports and the command-line settings.

pub mod error;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{AnnotationError, Result, SenseError};
