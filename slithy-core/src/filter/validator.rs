use std::collections::HashSet;
use std::fmt;

use regex::{Regex, RegexBuilder};

use super::ValidationFilter;
use super::pronounce::PronounceabilityModel;
use super::sentiment::SentimentLexicon;
use crate::error::SlithyError;

/// Why a candidate was turned down.
#[derive(Clone, Debug, PartialEq)]
pub enum Rejection {
	Empty,
	/// Does not match the required pattern.
	NoMatch,
	/// Matches the rejected pattern.
	Rejected,
	Dictionary,
	Blocklist,
	/// Already present in the training corpus.
	Corpus,
	/// Sentiment score outside the allowed range.
	Sentiment(f64),
	/// Pronounceability score below the floor.
	Pronounceability(f64),
}

impl fmt::Display for Rejection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Rejection::Empty => write!(f, "empty word"),
			Rejection::NoMatch => write!(f, "does not match the required pattern"),
			Rejection::Rejected => write!(f, "matches the rejected pattern"),
			Rejection::Dictionary => write!(f, "is a dictionary word"),
			Rejection::Blocklist => write!(f, "is blocklisted"),
			Rejection::Corpus => write!(f, "is a training corpus word"),
			Rejection::Sentiment(score) => write!(f, "sentiment {score:.3} out of range"),
			Rejection::Pronounceability(score) => write!(f, "pronounceability {score:.3} below floor"),
		}
	}
}

/// Checks candidates against every configured constraint.
///
/// Unset constraints are skipped. Patterns are case-insensitive and may
/// match anywhere in the word; word lists are compared lowercase.
///
/// Checks run in this order: empty word, required pattern, rejected
/// pattern, dictionary, blocklist, training corpus, sentiment range,
/// pronounceability floor. The first failing check is reported.
#[derive(Debug, Default)]
pub struct WordValidator<'a> {
	matches: Option<Regex>,
	rejects: Option<Regex>,
	dictionary: HashSet<String>,
	blocklist: HashSet<String>,
	corpus: HashSet<String>,
	sentiment: Option<&'a SentimentLexicon>,
	min_sentiment: Option<f64>,
	max_sentiment: Option<f64>,
	pronounceability: Option<(&'a PronounceabilityModel, f64)>,
}

impl<'a> WordValidator<'a> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Requires candidates to match `pattern`.
	///
	/// # Errors
	/// Returns an error if `pattern` is not a valid regex.
	pub fn matching(mut self, pattern: &str) -> Result<Self, SlithyError> {
		self.matches = Some(case_insensitive(pattern)?);
		Ok(self)
	}

	/// Rejects candidates matching `pattern`.
	///
	/// # Errors
	/// Returns an error if `pattern` is not a valid regex.
	pub fn rejecting(mut self, pattern: &str) -> Result<Self, SlithyError> {
		self.rejects = Some(case_insensitive(pattern)?);
		Ok(self)
	}

	/// Rejects known words, to keep only novel ones.
	pub fn with_dictionary(mut self, dictionary: HashSet<String>) -> Self {
		self.dictionary = dictionary;
		self
	}

	pub fn with_blocklist(mut self, blocklist: HashSet<String>) -> Self {
		self.blocklist = blocklist;
		self
	}

	/// Rejects words of the training corpus unless `allow_corpus_words`.
	pub fn with_corpus(mut self, corpus: HashSet<String>, allow_corpus_words: bool) -> Self {
		self.corpus = if allow_corpus_words { HashSet::new() } else { corpus };
		self
	}

	/// Keeps candidates whose sentiment score lies in `[min, max]`.
	///
	/// The lexicon is only consulted when at least one bound is set.
	pub fn with_sentiment(mut self, lexicon: &'a SentimentLexicon, min: Option<f64>, max: Option<f64>) -> Self {
		self.sentiment = Some(lexicon);
		self.min_sentiment = min;
		self.max_sentiment = max;
		self
	}

	pub fn with_pronounceability(mut self, model: &'a PronounceabilityModel, floor: f64) -> Self {
		self.pronounceability = Some((model, floor));
		self
	}

	/// Runs every check and reports the first failure.
	pub fn check(&self, word: &str) -> Result<(), Rejection> {
		if word.is_empty() {
			return Err(Rejection::Empty);
		}
		if let Some(pattern) = &self.matches {
			if !pattern.is_match(word) {
				return Err(Rejection::NoMatch);
			}
		}
		if let Some(pattern) = &self.rejects {
			if pattern.is_match(word) {
				return Err(Rejection::Rejected);
			}
		}

		let lower = word.to_lowercase();
		if self.dictionary.contains(&lower) {
			return Err(Rejection::Dictionary);
		}
		if self.blocklist.contains(&lower) {
			return Err(Rejection::Blocklist);
		}
		if self.corpus.contains(&lower) {
			return Err(Rejection::Corpus);
		}

		if let Some(lexicon) = self.sentiment {
			if self.min_sentiment.is_some() || self.max_sentiment.is_some() {
				let score = lexicon.score(word);
				let too_low = self.min_sentiment.is_some_and(|min| score < min);
				let too_high = self.max_sentiment.is_some_and(|max| score > max);
				if too_low || too_high {
					return Err(Rejection::Sentiment(score));
				}
			}
		}

		if let Some((model, floor)) = self.pronounceability {
			let score = model.score(word);
			if score < floor {
				return Err(Rejection::Pronounceability(score));
			}
		}

		Ok(())
	}
}

impl ValidationFilter for WordValidator<'_> {
	fn accept(&self, candidate: &str) -> bool {
		match self.check(candidate) {
			Ok(()) => true,
			Err(rejection) => {
				log::trace!("rejected '{candidate}': {rejection}");
				false
			}
		}
	}
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
	RegexBuilder::new(pattern).case_insensitive(true).build()
}
