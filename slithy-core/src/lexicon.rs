//! Pronunciation lookup.
//!
//! The engine only ever asks one question of a lexicon: "how is this word
//! pronounced?". [`PhoneticLexicon`] captures that question so that the
//! pipelines can run on the CMU pronouncing dictionary ([`CmuDict`]) or on
//! any in-memory table.
//!
//! The CMU format lists one pronunciation per line, alternates carrying a
//! `(N)` suffix:
//!
//! ```text
//! ;;; comment line
//! CAT  K AE1 T
//! EITHER  IY1 DH ER0
//! EITHER(2)  AY1 DH ER0
//! achill AE1 K IH0 L # place, irish
//! ```

use std::collections::HashMap;
use std::path::Path;

use crate::error::SlithyError;
use crate::io::read_lines;
use crate::phoneme::{Phoneme, Pronunciation};

/// Resolves a word to its pronunciation variants.
pub trait PhoneticLexicon {
	/// All known variants of `word`, in dictionary order.
	///
	/// Returns `None` if the word is unknown.
	fn pronunciations(&self, word: &str) -> Option<&[Pronunciation]>;

	/// The first listed variant, the only one the generation engine uses.
	fn first_pronunciation(&self, word: &str) -> Option<&[Phoneme]> {
		self.pronunciations(word)?.first().map(Vec::as_slice)
	}
}

/// The CMU pronouncing dictionary, indexed by lowercase word.
#[derive(Clone, Debug, Default)]
pub struct CmuDict {
	entries: HashMap<String, Vec<Pronunciation>>,
}

impl CmuDict {
	/// Loads a dictionary file (plain or gzip).
	///
	/// # Errors
	/// Returns [`SlithyError::LexiconUnavailable`] if the file cannot be read.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SlithyError> {
		let path = path.as_ref();
		let lines = read_lines(path).map_err(|e| SlithyError::LexiconUnavailable {
			path: path.to_path_buf(),
			reason: e.to_string(),
		})?;
		let dict = Self::from_lines(lines);
		log::info!("loaded {} words from pronouncing dictionary {}", dict.len(), path.display());
		Ok(dict)
	}

	/// Parses dictionary lines; malformed lines are skipped.
	pub fn from_lines<I, S>(lines: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut dict = Self::default();
		for line in lines {
			if let Some((word, pronunciation)) = parse_line(line.as_ref()) {
				dict.insert(word, pronunciation);
			}
		}
		dict
	}

	/// Builds a dictionary from `(word, phonemes)` pairs.
	pub fn from_entries<I, W>(entries: I) -> Self
	where
		I: IntoIterator<Item = (W, Pronunciation)>,
		W: AsRef<str>,
	{
		let mut dict = Self::default();
		for (word, pronunciation) in entries {
			dict.insert(word.as_ref(), pronunciation);
		}
		dict
	}

	/// Appends a pronunciation variant for `word`.
	pub fn insert(&mut self, word: impl AsRef<str>, pronunciation: Pronunciation) {
		self.entries
			.entry(word.as_ref().to_lowercase())
			.or_default()
			.push(pronunciation);
	}

	/// Number of distinct words.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Every word of the dictionary, sorted.
	pub fn words(&self) -> Vec<&str> {
		let mut words: Vec<&str> = self.entries.keys().map(String::as_str).collect();
		words.sort_unstable();
		words
	}
}

impl PhoneticLexicon for CmuDict {
	fn pronunciations(&self, word: &str) -> Option<&[Pronunciation]> {
		self.entries.get(&word.to_lowercase()).map(Vec::as_slice)
	}
}

/// Parses one dictionary line into a lowercase word and its phonemes.
fn parse_line(line: &str) -> Option<(String, Pronunciation)> {
	// Inline comments need leading whitespace: "#hash-mark" is a real entry
	let comment = line
		.match_indices('#')
		.map(|(index, _)| index)
		.find(|&index| line[..index].ends_with(char::is_whitespace));
	let line = comment.map_or(line, |index| &line[..index]);
	let line = line.trim();
	if line.is_empty() || line.starts_with(";;;") {
		return None;
	}

	let mut tokens = line.split_whitespace();
	let term = strip_variant(tokens.next()?);
	let phonemes: Pronunciation = tokens.map(Phoneme::from).collect();
	if term.is_empty() || phonemes.is_empty() {
		return None;
	}
	Some((term.to_lowercase(), phonemes))
}

/// `either(2)` -> `either`; other terms are returned unchanged.
fn strip_variant(term: &str) -> &str {
	let Some(inner) = term.strip_suffix(')') else {
		return term;
	};
	match inner.rfind('(') {
		Some(open) if open > 0 && inner[open + 1..].chars().all(|c| c.is_ascii_digit()) => &inner[..open],
		_ => term,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::phoneme::parse_pronunciation;
	use flate2::Compression;
	use flate2::write::GzEncoder;
	use std::fs;
	use std::io::Write;

	const SAMPLE: &str = ";;; CMUdict sample
CAT  K AE1 T
EITHER  IY1 DH ER0
EITHER(2)  AY1 DH ER0
achill AE1 K IH0 L # place, irish
abbe	AE1 B IY0	#old spelling
#hash-mark  HH AE1 SH M AA2 R K
(paren  P ER0 EH1 N
broken
";

	fn sample() -> CmuDict {
		CmuDict::from_lines(SAMPLE.lines())
	}

	#[test]
	fn parses_words_and_variants() {
		let dict = sample();
		assert_eq!(dict.len(), 6);
		assert_eq!(dict.first_pronunciation("cat"), Some(parse_pronunciation("K AE1 T").as_slice()));

		let either = dict.pronunciations("either").unwrap();
		assert_eq!(either.len(), 2);
		assert_eq!(either[1], parse_pronunciation("AY1 DH ER0"));
	}

	#[test]
	fn lookup_is_case_insensitive() {
		let dict = sample();
		assert!(dict.pronunciations("CAT").is_some());
		assert!(dict.pronunciations("Either").is_some());
	}

	#[test]
	fn comments_and_malformed_lines() {
		let dict = sample();
		assert_eq!(dict.first_pronunciation("achill"), Some(parse_pronunciation("AE1 K IH0 L").as_slice()));
		assert_eq!(dict.first_pronunciation("abbe"), Some(parse_pronunciation("AE1 B IY0").as_slice()));
		assert!(dict.pronunciations("#hash-mark").is_some());
		assert!(dict.pronunciations("(paren").is_some());
		assert!(dict.pronunciations("broken").is_none());
		assert!(dict.pronunciations("dog").is_none());
	}

	#[test]
	fn variant_suffix_stripping() {
		assert_eq!(strip_variant("either(2)"), "either");
		assert_eq!(strip_variant("either"), "either");
		assert_eq!(strip_variant("(2)"), "(2)");
		assert_eq!(strip_variant("smile(y)"), "smile(y)");
	}

	#[test]
	fn words_are_sorted_and_unique() {
		let dict = CmuDict::from_entries([
			("zebra", parse_pronunciation("Z IY1 B R AH0")),
			("apple", parse_pronunciation("AE1 P AH0 L")),
			("Apple", parse_pronunciation("AE1 P L")),
		]);
		assert_eq!(dict.words(), vec!["apple", "zebra"]);
		assert_eq!(dict.pronunciations("apple").unwrap().len(), 2);
	}

	#[test]
	fn loads_gzip_dictionaries() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("cmudict.dict.gz");
		let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
		encoder.write_all(SAMPLE.as_bytes()).unwrap();
		fs::write(&path, encoder.finish().unwrap()).unwrap();

		let dict = CmuDict::load(&path).unwrap();
		assert_eq!(dict.len(), sample().len());
		assert_eq!(dict.pronunciations("either").unwrap().len(), 2);
	}

	#[test]
	fn missing_file_is_unavailable() {
		let dir = tempfile::tempdir().unwrap();
		let result = CmuDict::load(dir.path().join("missing.dict"));
		assert!(matches!(result, Err(SlithyError::LexiconUnavailable { .. })));
	}
}
