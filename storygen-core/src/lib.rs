//! Markov-chain text generation library.
//!
//! This crate builds a variable-order Markov chain over tokenized text and
//! generates new text by sampling from it, including:
//! - A word trie storing observed sequences with occurrence counts
//! - Model training by sliding context windows across a token sequence
//! - Seed completion and weighted random-walk generation
//! - Corpus loading and cleaning helpers for plain and Project Gutenberg texts

/// Core trie, model and generation logic.
pub mod model;

/// Corpus cleaning and tokenization.
///
/// Strips Project Gutenberg boilerplate, lowercases and splits into words.
pub mod clean;

/// I/O utilities (file loading, path helpers).
pub mod io;
