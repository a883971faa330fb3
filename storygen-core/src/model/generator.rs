use std::collections::HashMap;

use rand::Rng;

use super::markov_model::MarkovModel;
use super::trie::TrieNode;

/// Generates text by walking a trained [`MarkovModel`].
///
/// Starting from a (possibly incomplete) seed, the generator first lets the
/// model complete the seed up to its order, then repeatedly looks up the
/// continuations of the trailing context window and draws the next word with
/// probability proportional to its observed frequency.
///
/// # Responsibilities
/// - Drive seed completion before the first sampling step
/// - Perform the weighted random walk up to the requested length
/// - Stop cleanly on dead ends (contexts with no observed continuation)
///
/// # Invariants
/// - The returned sequence is never longer than the requested length
/// - The model is only ever read, never mutated
#[derive(Debug)]
pub struct Generator<'a> {
	model: &'a MarkovModel,
}

impl<'a> Generator<'a> {
	/// Creates a generator over a trained model.
	pub fn new(model: &'a MarkovModel) -> Self {
		Self { model }
	}

	/// Generates a word sequence, using the thread-local RNG.
	///
	/// See [`Generator::generate_with`].
	pub fn generate(&self, seed: &[String], target_length: usize) -> Result<Vec<String>, String> {
		self.generate_with(seed, target_length, &mut rand::rng())
	}

	/// Generates a word sequence of at most `target_length` words.
	///
	/// The seed is first completed to the model order; every further word is
	/// drawn from the continuations of the trailing context window, weighted
	/// by frequency. A context with no observed continuation ends the walk
	/// early — that is a defined termination, not an error. The result is
	/// truncated to `target_length`, so a `target_length` of 0 yields an
	/// empty sequence.
	///
	/// # Errors
	/// Returns an error if the seed cannot be completed to the model order
	/// (unknown prefix, or an empty model). Callers typically retry once
	/// with an empty seed in that case.
	pub fn generate_with<R: Rng>(&self, seed: &[String], target_length: usize, rng: &mut R) -> Result<Vec<String>, String> {
		let order = self.model.order();
		let mut sequence = self
			.model
			.complete_seed_with(seed, rng)
			.ok_or_else(|| "no continuation found for the starting sequence".to_owned())?;

		while sequence.len() < target_length {
			let context = &sequence[sequence.len() - order..];
			let next = match self.model.get_children(context) {
				Some(children) => Self::pick_weighted(children, rng),
				None => None,
			};
			match next {
				Some(word) => sequence.push(word),
				// Dead end, return what was built so far
				None => break,
			}
		}

		sequence.truncate(target_length);
		log::debug!("generated {} of {} requested words", sequence.len(), target_length);
		Ok(sequence)
	}

	/// Draws one word with probability proportional to its frequency.
	///
	/// Performs an O(n) cumulative scan over the raw counts; no
	/// normalization is needed for the draw itself.
	///
	/// Returns `None` if there is nothing to draw from (no children, or
	/// only zero counts — the latter cannot occur for full-order contexts,
	/// whose children are all window-terminal nodes, but is kept for safety).
	fn pick_weighted<R: Rng>(children: &HashMap<String, TrieNode>, rng: &mut R) -> Option<String> {
		if children.is_empty() {
			return None;
		}

		let total: u64 = children.values().map(TrieNode::frequency).sum();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);

		let mut fallback: Option<&String> = None;
		for (word, node) in children {
			if r < node.frequency() {
				return Some(word.clone());
			}
			r -= node.frequency();
			fallback = Some(word);
		}

		// Fallback: should not happen, but kept for safety.
		fallback.cloned()
	}

	/// Converts child frequencies into a probability distribution.
	///
	/// Each word maps to `frequency / total`; the values sum to 1 for any
	/// non-empty children mapping with at least one observation. Empty
	/// children yield an empty distribution.
	pub fn distribution(children: &HashMap<String, TrieNode>) -> HashMap<String, f64> {
		let total: u64 = children.values().map(TrieNode::frequency).sum();
		if total == 0 {
			return HashMap::new();
		}
		children
			.iter()
			.map(|(word, node)| (word.clone(), node.frequency() as f64 / total as f64))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn words(text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_owned).collect()
	}

	#[test]
	fn generates_exactly_the_requested_length() {
		// "a" and "b" each have a single continuation, the walk cannot die
		let model = MarkovModel::new(&words("a b a b a b a"), 1).unwrap();
		let generator = Generator::new(&model);
		let mut rng = StdRng::seed_from_u64(42);

		let sequence = generator.generate_with(&words("a"), 10, &mut rng).unwrap();
		assert_eq!(sequence.len(), 10);
		assert_eq!(sequence, words("a b a b a b a b a b"));
	}

	#[test]
	fn dead_end_stops_generation_early() {
		// After "c" nothing was ever observed
		let model = MarkovModel::new(&words("a b c"), 1).unwrap();
		let generator = Generator::new(&model);
		let mut rng = StdRng::seed_from_u64(42);

		let sequence = generator.generate_with(&words("a"), 10, &mut rng).unwrap();
		assert_eq!(sequence, words("a b c"));
	}

	#[test]
	fn never_longer_than_the_requested_length() {
		let model = MarkovModel::new(&words("a b c d"), 2).unwrap();
		let generator = Generator::new(&model);
		let mut rng = StdRng::seed_from_u64(42);

		// Completion alone already exceeds the target; the result is cut back
		let sequence = generator.generate_with(&words("a"), 1, &mut rng).unwrap();
		assert_eq!(sequence.len(), 1);

		let sequence = generator.generate_with(&words("a"), 0, &mut rng).unwrap();
		assert!(sequence.is_empty());
	}

	#[test]
	fn unknown_seed_is_an_error() {
		let model = MarkovModel::new(&words("a b c d"), 2).unwrap();
		let generator = Generator::new(&model);
		let mut rng = StdRng::seed_from_u64(42);

		assert!(generator.generate_with(&words("zebra"), 10, &mut rng).is_err());
	}

	#[test]
	fn empty_model_yields_error_or_seed_only_result() {
		let model = MarkovModel::new(&words("a b"), 2).unwrap();
		let generator = Generator::new(&model);
		let mut rng = StdRng::seed_from_u64(42);

		// An empty seed cannot be completed on an empty model
		assert!(generator.generate_with(&[], 10, &mut rng).is_err());

		// A caller-supplied full-length context dead-ends immediately
		let sequence = generator.generate_with(&words("x y"), 10, &mut rng).unwrap();
		assert_eq!(sequence, words("x y"));
	}

	#[test]
	fn only_observed_continuations_are_drawn() {
		let tokens = words("the cat sat on the mat the cat ran");
		let model = MarkovModel::new(&tokens, 1).unwrap();
		let generator = Generator::new(&model);
		let mut rng = StdRng::seed_from_u64(42);

		for _ in 0..50 {
			let sequence = generator.generate_with(&words("the"), 2, &mut rng).unwrap();
			assert_eq!(sequence[0], "the");
			assert!(sequence[1] == "cat" || sequence[1] == "mat");
		}
	}

	#[test]
	fn draws_respect_the_frequency_weights() {
		let tokens = words("the cat sat on the mat the cat ran");
		let model = MarkovModel::new(&tokens, 1).unwrap();
		let children = model.get_children(&words("the")).unwrap();
		let mut rng = StdRng::seed_from_u64(42);

		// p(cat) = 2/3, p(mat) = 1/3; over 300 draws "cat" dominates
		let mut cat = 0;
		let mut mat = 0;
		for _ in 0..300 {
			match Generator::pick_weighted(children, &mut rng).unwrap().as_str() {
				"cat" => cat += 1,
				"mat" => mat += 1,
				other => panic!("unexpected draw: {other}"),
			}
		}
		assert!(cat > mat);
		assert_eq!(cat + mat, 300);
	}

	#[test]
	fn distribution_is_normalized() {
		let tokens = words("the cat sat on the mat the cat ran");
		let model = MarkovModel::new(&tokens, 1).unwrap();
		let children = model.get_children(&words("the")).unwrap();

		let distribution = Generator::distribution(children);
		assert_eq!(distribution.len(), 2);
		assert!((distribution["cat"] - 2.0 / 3.0).abs() < 1e-9);
		assert!((distribution["mat"] - 1.0 / 3.0).abs() < 1e-9);

		let total: f64 = distribution.values().sum();
		assert!((total - 1.0).abs() < 1e-9);
	}

	#[test]
	fn distribution_of_nothing_is_empty() {
		let children = HashMap::new();
		assert!(Generator::distribution(&children).is_empty());
	}
}
