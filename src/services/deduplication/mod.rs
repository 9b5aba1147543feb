//! Duplicate detection for word entries.
//!
//! A word is a duplicate when its canonical text already exists in the same
//! collection. Matching is exact; there is no fuzzy or cross-collection check.

mod exact_match;

pub use exact_match::DuplicateChecker;
