use std::collections::{HashMap, HashSet};

use crate::model::Token;

/// Add-k smoothing constant; close to 0 so unseen pairs weigh heavily.
const SMOOTHING_K: f64 = 0.001;

/// Letter bigram statistics used to score pronounceability.
///
/// Words are framed as `Start, letters.., End`. The score of a candidate is
/// the geometric mean of its smoothed bigram probabilities:
///
/// `P(b | a) = (C(a, b) + k) / (C(a) + k * V)`
///
/// where `C(a)` counts bigrams starting with `a` and `V` is the number of
/// distinct tokens that may follow (letters plus `End`). The score lies in
/// `[0, 1]`; words built from frequent letter pairs score higher.
#[derive(Clone, Debug, Default)]
pub struct PronounceabilityModel {
	contexts: HashMap<Token<char>, u64>,
	bigrams: HashMap<(Token<char>, Token<char>), u64>,
	vocabulary: usize,
}

impl PronounceabilityModel {
	/// Counts letter bigrams over a corpus of words.
	pub fn train<I, S>(words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut model = Self::default();
		let mut followers: HashSet<Token<char>> = HashSet::new();

		for word in words {
			let tokens = frame(word.as_ref());
			for pair in tokens.windows(2) {
				*model.contexts.entry(pair[0].clone()).or_insert(0) += 1;
				*model.bigrams.entry((pair[0].clone(), pair[1].clone())).or_insert(0) += 1;
				followers.insert(pair[1].clone());
			}
		}
		model.vocabulary = followers.len();
		model
	}

	/// Scores `word` in `[0, 1]`; an empty word or an untrained model scores 0.
	pub fn score(&self, word: &str) -> f64 {
		if word.is_empty() || self.vocabulary == 0 {
			return 0.0;
		}

		let tokens = frame(word);
		let smoothed_vocabulary = SMOOTHING_K * self.vocabulary as f64;
		let mut log_sum = 0.0;
		let mut count = 0usize;

		for pair in tokens.windows(2) {
			let context = self.contexts.get(&pair[0]).copied().unwrap_or(0) as f64;
			let bigram = self
				.bigrams
				.get(&(pair[0].clone(), pair[1].clone()))
				.copied()
				.unwrap_or(0) as f64;
			log_sum += ((bigram + SMOOTHING_K) / (context + smoothed_vocabulary)).ln();
			count += 1;
		}

		(log_sum / count as f64).exp().min(1.0)
	}
}

fn frame(word: &str) -> Vec<Token<char>> {
	let mut tokens = vec![Token::Start];
	tokens.extend(word.to_lowercase().chars().map(Token::Symbol));
	tokens.push(Token::End);
	tokens
}

#[cfg(test)]
mod tests {
	use super::*;

	fn model() -> PronounceabilityModel {
		PronounceabilityModel::train(["banana", "bandana", "cabana", "panama", "nab"])
	}

	#[test]
	fn corpus_like_words_score_higher() {
		let model = model();
		let familiar = model.score("banama");
		let alien = model.score("xqzkv");
		assert!(familiar > alien, "{familiar} <= {alien}");
		assert!(alien < 0.1);
	}

	#[test]
	fn scores_stay_in_unit_range() {
		let model = model();
		for word in ["banana", "b", "zzzz", "nabanab"] {
			let score = model.score(word);
			assert!((0.0..=1.0).contains(&score), "{word}: {score}");
		}
	}

	#[test]
	fn degenerate_inputs_score_zero() {
		assert_eq!(model().score(""), 0.0);
		assert_eq!(PronounceabilityModel::default().score("banana"), 0.0);
	}
}
