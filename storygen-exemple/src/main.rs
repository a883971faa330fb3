use storygen_core::clean;
use storygen_core::io;
use storygen_core::model::generator::Generator;
use storygen_core::model::markov_model::MarkovModel;

/// Fallback corpus used when no text file is found under ./data.
const SAMPLE_TEXT: &str = "\
Alice was beginning to get very tired of sitting by her sister on the bank.
She was considering in her own mind whether the pleasure of making a
daisy-chain would be worth the trouble of getting up and picking the daisies,
when suddenly a White Rabbit with pink eyes ran close by her.
The Rabbit actually took a watch out of its waistcoat-pocket, and looked at
it, and then hurried on. Alice started to her feet, and burning with
curiosity, she ran across the field after it.";

/// Trains a model from the first `.txt` corpus under ./data, if any.
fn load_corpus_model(order: usize) -> Option<MarkovModel> {
	let folder = io::normalize_folder("./data");
	let mut files = io::list_files(&folder, "txt").ok()?;
	files.sort();
	let first = files.first()?;
	let path = folder.join(first);

	match MarkovModel::from_file(&path, order) {
		Ok(model) => {
			println!("Loaded corpus: {}", io::get_filename(&path).unwrap_or_else(|_| first.clone()));
			Some(model)
		}
		Err(e) => {
			log::warn!("failed to load {}: {}", path.display(), e);
			None
		}
	}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();

	// The order is the number of preceding words used as context
	let order = 2;

	// Train from ./data when a corpus file is available, otherwise fall back
	// to the built-in sample text
	let model = match load_corpus_model(order) {
		Some(model) => model,
		None => {
			println!("No corpus found under ./data, using the built-in sample");
			let lines: Vec<String> = SAMPLE_TEXT.lines().map(str::to_owned).collect();
			let tokens = clean::tokenize(&lines);
			MarkovModel::new(&tokens, order)?
		}
	};

	// An order below 1 is rejected at construction
	match MarkovModel::new(&[], 0) {
		Ok(_) => println!("Should not happen"),
		Err(_) => println!("An order of 0 is invalid, must be >= 1"),
	}

	// Generate 10 texts of 20 words each; the starting context is
	// synthesized from the corpus since no seed is given
	let generator = Generator::new(&model);
	for i in 0..10 {
		println!("Generated text {}: {}", i + 1, generator.generate(&[], 20)?.join(" "));
	}

	// A custom seed is completed to the model order first; a seed the corpus
	// never continues fails, and the caller falls back to an empty seed
	let seed: Vec<String> = vec!["the".to_owned()];
	match generator.generate(&seed, 20) {
		Ok(words) => println!("Seeded text: {}", words.join(" ")),
		Err(_) => {
			println!("Seed '{}' not found in the corpus, retrying unseeded", seed.join(" "));
			println!("Fallback text: {}", generator.generate(&[], 20)?.join(" "));
		}
	}

	// What can follow a full-order context, with probabilities
	if let Some(context) = model.complete_seed(&seed) {
		if let Some(children) = model.get_children(&context) {
			println!("Words observed after '{}':", context.join(" "));
			for (word, probability) in Generator::distribution(children) {
				println!("  {}: {:.3}", word, probability);
			}
		}
	}

	Ok(())
}
