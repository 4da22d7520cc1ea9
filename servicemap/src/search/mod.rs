//! Search-term synthesis
//!
//! Derives the denormalized `Search_Terms` field from a composed record and
//! the keyword dictionary.

pub mod synthesizer;

pub use synthesizer::{apply_search_terms, search_tokens, synthesize_search_terms, DESCRIPTIVE_FIELDS};
