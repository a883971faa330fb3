//! Top-level module for the Markov text generation system.
//!
//! This module groups the three pieces of the core:
//! - A word trie storing observed sequences with occurrence counts (`Trie`)
//! - A variable-order Markov model trained over that trie (`MarkovModel`)
//! - A weighted random walk producing new text (`Generator`)

/// Ordered prefix tree over word tokens.
///
/// Stores every inserted word sequence together with its occurrence count;
/// shared prefixes share nodes.
pub mod trie;

/// Variable-order Markov model built by sliding windows into the trie.
///
/// Handles training (sequential and chunked-parallel from a corpus file),
/// seed completion, and read-only context lookups.
pub mod markov_model;

/// Text generation by weighted random walk over a trained model.
///
/// Exposes frequency-proportional sampling and probability normalization.
pub mod generator;
