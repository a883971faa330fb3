/// Line prefix marking the start of the body text in a Project Gutenberg file.
const START_MARKER: &str = "*** START OF THE PROJECT GUTENBERG EBOOK";

/// Line prefix marking the end of the body text in a Project Gutenberg file.
const END_MARKER: &str = "*** END OF THE PROJECT GUTENBERG EBOOK";

/// Characters removed from the text before splitting into words.
const DISALLOWED_CHARACTERS: &str = ",.\"'_@#$%^&*(){}/;~:<>+=\\";

/// Cleans raw corpus lines and tokenizes them into a flat word sequence.
///
/// Project Gutenberg boilerplate is skipped: only lines between the
/// `*** START ... ***` and `*** END ... ***` marker lines are kept. Kept
/// lines are lowercased, stripped of punctuation and split on whitespace.
///
/// # Notes
/// - A text without any start marker is treated entirely as body, so plain
///   files tokenize instead of producing an empty corpus.
/// - The marker lines themselves are never part of the output.
pub fn tokenize(lines: &[String]) -> Vec<String> {
	let mut tokens = Vec::new();
	let mut body = !lines.iter().any(|line| line.starts_with(START_MARKER));

	for line in lines {
		if line.starts_with(END_MARKER) {
			body = false;
			continue;
		}
		if line.starts_with(START_MARKER) {
			body = true;
			continue;
		}
		if !body {
			continue;
		}

		let line = line.to_lowercase();
		let line: String = line.chars().filter(|c| !DISALLOWED_CHARACTERS.contains(*c)).collect();
		tokens.extend(line.split_whitespace().map(str::to_owned));
	}

	tokens
}
