use std::collections::HashMap;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;
use storygen_core::io::list_files;
use storygen_core::model::generator::Generator;
use storygen_core::model::markov_model::MarkovModel;

/// Generated text length when the request does not specify one.
const DEFAULT_LENGTH: usize = 100;

/// Model order when the request does not specify one.
const DEFAULT_ORDER: usize = 2;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	length: Option<usize>,
	seed: Option<String>, // whitespace-separated words, or "none"
}

/// Struct representing query parameters for the `/v1/children` endpoint
#[derive(Deserialize)]
struct ChildrenParams {
	context: Option<String>,
}

/// Struct representing query parameters for the `/v1/load_corpus` endpoint
#[derive(Deserialize)]
struct LoadParams {
	name: Option<String>,
	order: Option<usize>,
}

struct SharedData {
	model: Option<MarkovModel>,
	corpus: Option<String>,
}

impl GenerateParams {
	/// Splits the seed parameter into words.
	///
	/// An absent seed or the literal `"none"` means unseeded generation,
	/// which starts from a random corpus-supported context.
	fn seed_words(&self) -> Vec<String> {
		match &self.seed {
			None => Vec::new(),
			Some(s) if s.to_lowercase() == "none" => Vec::new(),
			Some(s) => s.split_whitespace().map(str::to_owned).collect(),
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a word sequence from the loaded model. A seed that has no
/// continuation in the corpus is retried once unseeded, with a logged notice.
/// Returns the generated words joined with spaces as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let length = query.length.unwrap_or(DEFAULT_LENGTH);
	let seed = query.seed_words();

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let model = match &shared_data.model {
		Some(model) => model,
		None => return HttpResponse::BadRequest().body("No corpus loaded"),
	};

	let generator = Generator::new(model);
	let words = match generator.generate(&seed, length) {
		Ok(words) => words,
		Err(_) if !seed.is_empty() => {
			// Non-fatal: the user seed has no continuation in this corpus
			log::warn!("seed '{}' not found in the corpus, retrying unseeded", seed.join(" "));
			match generator.generate(&[], length) {
				Ok(words) => words,
				Err(e) => return HttpResponse::InternalServerError().body(e),
			}
		}
		Err(e) => return HttpResponse::InternalServerError().body(e),
	};

	HttpResponse::Ok().body(words.join(" "))
}

/// HTTP GET endpoint `/v1/children`
///
/// Returns the words observed immediately after the given context, with
/// their occurrence counts, as a JSON object. The context may be shorter
/// than the model order (or empty, resolving to all first words).
#[get("/v1/children")]
async fn get_children(data: web::Data<Mutex<SharedData>>, query: web::Query<ChildrenParams>) -> impl Responder {
	let context: Vec<String> = match &query.context {
		Some(s) => s.split_whitespace().map(str::to_owned).collect(),
		None => Vec::new(),
	};

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let model = match &shared_data.model {
		Some(model) => model,
		None => return HttpResponse::BadRequest().body("No corpus loaded"),
	};

	match model.get_children(&context) {
		Some(children) => {
			let frequencies: HashMap<String, u64> = children
				.iter()
				.map(|(word, node)| (word.clone(), node.frequency()))
				.collect();
			HttpResponse::Ok().json(frequencies)
		}
		None => HttpResponse::NotFound().body("Context not found in the corpus"),
	}
}

/// HTTP GET endpoint `/v1/corpora`
///
/// Lists the corpus files available for loading.
#[get("/v1/corpora")]
async fn get_corpora() -> impl Responder {
	match list_files("./data", "txt") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".txt", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

/// HTTP GET endpoint `/v1/corpus`
///
/// Returns the name and order of the loaded corpus, if any.
#[get("/v1/corpus")]
async fn get_corpus(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match (&shared_data.corpus, &shared_data.model) {
		(Some(name), Some(model)) => HttpResponse::Ok().body(format!("{} (order {})", name, model.order())),
		_ => HttpResponse::NotFound().body("No corpus loaded"),
	}
}

/// HTTP PUT endpoint `/v1/load_corpus`
///
/// Trains a fresh model from `./data/<name>.txt` and swaps it in. Training
/// runs outside the lock; the swap itself is atomic under the mutex.
#[put("/v1/load_corpus")]
async fn put_corpus(data: web::Data<Mutex<SharedData>>, query: web::Query<LoadParams>) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};
	let order = query.order.unwrap_or(DEFAULT_ORDER);
	if order < 1 {
		return HttpResponse::BadRequest().body("Order must be >= 1");
	}

	let corpus_path = format!("./data/{}.txt", name);
	let model = match MarkovModel::from_file(&corpus_path, order) {
		Ok(model) => model,
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}")),
	};
	if model.is_empty() {
		log::warn!("corpus '{}' is shorter than order {} + 1, the model is empty", name, order);
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.model = Some(model);
	shared_data.corpus = Some(name.to_owned());

	HttpResponse::Ok().body("Corpus loaded successfully")
}

/// Main entry point for the server.
///
/// Starts with no corpus loaded; clients pick one through
/// `PUT /v1/load_corpus` before generating.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Corpus files are looked up under `./data`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let shared_data = SharedData {
		model: None,
		corpus: None,
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_generated)
			.service(get_children)
			.service(get_corpora)
			.service(get_corpus)
			.service(put_corpus)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
