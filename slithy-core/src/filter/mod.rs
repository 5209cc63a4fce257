//! Candidate validation.
//!
//! The generation pipelines only see the [`ValidationFilter`] trait. The
//! concrete [`WordValidator`] combines regex patterns, word lists, a
//! sentiment range and a pronounceability floor.

use std::collections::HashSet;
use std::path::Path;

use crate::io::read_lines;

/// Sentiment scoring by greedy lexicon lookup.
pub mod sentiment;

/// Pronounceability scoring with a smoothed letter bigram model.
pub mod pronounce;

/// The configurable validator.
pub mod validator;

pub use pronounce::PronounceabilityModel;
pub use sentiment::SentimentLexicon;
pub use validator::{Rejection, WordValidator};

/// Accepts or rejects a generated candidate.
pub trait ValidationFilter {
	fn accept(&self, candidate: &str) -> bool;
}

impl<F> ValidationFilter for F
where
	F: Fn(&str) -> bool,
{
	fn accept(&self, candidate: &str) -> bool {
		self(candidate)
	}
}

/// Loads a word list (plain or gzip) into a set for lookups.
///
/// Words are trimmed and lowercased, empty lines dropped.
///
/// # Notes
/// - A missing or unreadable file (bad gzip, not UTF-8) is not fatal: a
///   warning is logged and an empty set is returned, which disables the
///   corresponding check.
pub fn load_word_set<P: AsRef<Path>>(path: P) -> HashSet<String> {
	let path = path.as_ref();
	match read_lines(path) {
		Ok(lines) => lines
			.into_iter()
			.map(|line| line.trim().to_lowercase())
			.filter(|word| !word.is_empty())
			.collect(),
		Err(e) => {
			log::warn!("could not read word list {}: {}. Skipping this check.", path.display(), e);
			HashSet::new()
		}
	}
}
