//! Data pipeline for Sense of Self.
//!
//! Reads archive exports, normalizes posts into a chronological collection,
//! aggregates them per calendar year and assembles the yearly reports.

pub mod aggregator;
pub mod analysis;
pub mod normalizer;
pub mod reader;
pub mod report;

pub use sense_core as core;
pub use sense_nlp as nlp;
