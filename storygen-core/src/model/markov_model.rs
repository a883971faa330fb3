use std::path::Path;
use std::sync::mpsc;
use std::thread;

use rand::Rng;
use rand::prelude::IteratorRandom;

use crate::clean;
use crate::io;
use super::trie::{Trie, TrieNode};
use std::collections::HashMap;

/// Number of training chunks per CPU core for the parallel corpus build.
const CHUNK_FACTOR: usize = 8;

/// A variable-order Markov model over word tokens, backed by a [`Trie`].
///
/// Training slides a window of `order + 1` words across the token sequence
/// and inserts each window into the trie, so looking up a context of `order`
/// words yields every observed continuation together with how many times that
/// exact `(context, continuation)` pair occurred.
///
/// # Responsibilities
/// - Build the trie from an ordered token sequence at construction
/// - Complete a partial starting sequence up to the model order
/// - Expose the observed continuations of a context, read-only
///
/// # Invariants
/// - `order` is always >= 1 and immutable after construction
/// - Every inserted window has length exactly `order + 1`
/// - A corpus of `order` tokens or fewer produces an empty model, never an error
#[derive(Clone, Debug)]
pub struct MarkovModel {
	/// Prefix tree holding every observed window and its occurrence count.
	trie: Trie,

	/// Number of preceding words used as context for the next word.
	order: usize,
}

impl MarkovModel {
	/// Creates a model of the given order and trains it on `tokens`.
	///
	/// Training is synchronous; the model is read-only afterward.
	///
	/// # Errors
	/// Returns an error if `order < 1`.
	///
	/// # Notes
	/// - A token sequence shorter than `order + 1` contains no windows and
	///   trains an empty model; generation on it terminates immediately.
	pub fn new(tokens: &[String], order: usize) -> Result<Self, String> {
		if order < 1 {
			return Err("order must be >= 1".to_owned());
		}

		let mut trie = Trie::new();
		Self::insert_windows(&mut trie, tokens, order);
		log::debug!(
			"trained model: order={}, tokens={}, windows={}",
			order,
			tokens.len(),
			tokens.len().saturating_sub(order)
		);
		Ok(Self { trie, order })
	}

	/// Reads a corpus file, tokenizes it and trains a model on the result.
	///
	/// The token sequence is split into chunks (CPU cores * factor) and each
	/// chunk is trained into a partial trie on its own thread; the partial
	/// tries are then merged. Chunks overlap by `order` tokens so every
	/// window crossing a chunk boundary is counted exactly once, and the
	/// merged trie is identical to one trained sequentially.
	///
	/// # Errors
	/// - Returns an error if `order < 1`.
	/// - Returns an error if the file cannot be read.
	pub fn from_file<P: AsRef<Path>>(filepath: P, order: usize) -> Result<Self, Box<dyn std::error::Error>> {
		if order < 1 {
			return Err("order must be >= 1".into());
		}

		let lines = io::read_file(&filepath)?;
		let tokens = clean::tokenize(&lines);
		log::info!(
			"building model from {} ({} tokens, order {})",
			filepath.as_ref().display(),
			tokens.len(),
			order
		);
		Ok(Self::build_parallel(&tokens, order)?)
	}

	/// Trains a model by distributing window insertion across threads.
	///
	/// Each worker owns its partial trie; finished tries are collected over
	/// an MPSC channel and merged sequentially, so no locking is involved.
	fn build_parallel(tokens: &[String], order: usize) -> Result<Self, String> {
		if order < 1 {
			return Err("order must be >= 1".to_owned());
		}
		if tokens.len() <= order {
			// No complete window, the model stays empty
			return Ok(Self { trie: Trie::new(), order });
		}

		let window_count = tokens.len() - order;
		let chunks = num_cpus::get() * CHUNK_FACTOR;
		let chunk_size = (window_count + chunks - 1) / chunks;

		let (tx, rx) = mpsc::channel();
		let mut start = 0;
		while start < window_count {
			let end = (start + chunk_size).min(window_count);
			// Windows starting in [start, end) reach up to end + order tokens
			let slice: Vec<String> = tokens[start..end + order].to_vec();
			let tx = tx.clone();

			thread::spawn(move || {
				let mut partial = Trie::new();
				for window in slice.windows(order + 1) {
					partial.insert(window);
				}
				tx.send(partial).expect("Failed to send from thread");
			});
			start = end;
		}
		drop(tx);

		let mut trie = Trie::new();
		for partial in rx.iter() {
			trie.merge(partial);
		}

		log::debug!("trained model: order={}, tokens={}, windows={}", order, tokens.len(), window_count);
		Ok(Self { trie, order })
	}

	/// Inserts every window of `order + 1` consecutive tokens into the trie.
	fn insert_windows(trie: &mut Trie, tokens: &[String], order: usize) {
		if tokens.len() <= order {
			return;
		}
		for window in tokens.windows(order + 1) {
			trie.insert(window);
		}
	}

	/// Returns the model order (number of context words).
	pub fn order(&self) -> usize {
		self.order
	}

	/// Returns true if training produced no windows.
	pub fn is_empty(&self) -> bool {
		self.trie.is_empty()
	}

	/// Returns the observed continuations of `context`, read-only.
	///
	/// `None` means the context never occurred in the corpus; an empty
	/// context always resolves to the first words of all observed windows.
	pub fn get_children(&self, context: &[String]) -> Option<&HashMap<String, TrieNode>> {
		self.trie.get_children(context)
	}

	/// Completes a partial starting sequence up to the model order.
	///
	/// Uses the thread-local RNG; see [`MarkovModel::complete_seed_with`].
	pub fn complete_seed(&self, seed: &[String]) -> Option<Vec<String>> {
		self.complete_seed_with(seed, &mut rand::rng())
	}

	/// Completes a partial starting sequence up to the model order.
	///
	/// While the sequence is shorter than the order, one of the words
	/// observed after the current sequence is appended, chosen uniformly at
	/// random among the available continuations.
	///
	/// Returns `None` as soon as no continuation exists. The result is
	/// either a sequence of length `order` (or the unchanged input if it was
	/// already long enough), or `None` — never an intermediate length.
	pub fn complete_seed_with<R: Rng>(&self, seed: &[String], rng: &mut R) -> Option<Vec<String>> {
		let mut sequence = seed.to_vec();
		while sequence.len() < self.order {
			let children = self.trie.get_children(&sequence)?;
			let next = children.keys().choose(rng)?;
			sequence.push(next.clone());
		}
		Some(sequence)
	}
}
