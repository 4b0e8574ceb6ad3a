//! # concept-grammar-model
//!
//! Shared data structures for `concept-grammar`.
//!
//! ## Contents
//!
//! 1. **[language]**: the language description the translator reads (concepts,
//!    notations, tokens, patterns).
//! 2. **[grammar]**: the grammar the translator writes (parser rules as part
//!    trees, ordered token declarations).
//! 3. **[analysis]**: structural queries over a finished grammar.

pub mod analysis;
pub mod grammar;
pub mod language;
