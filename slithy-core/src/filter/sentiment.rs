use std::collections::HashMap;
use std::path::Path;

use crate::error::SlithyError;
use crate::io::read_lines;

/// Score of a word with no sentiment-bearing fragment.
pub const NEUTRAL: f64 = 0.5;

/// Valences in a VADER lexicon lie roughly in `[-4, 4]`.
const VALENCE_BOUND: f64 = 4.0;

/// Shortest fragment looked up; single letters carry no sentiment.
const MIN_FRAGMENT: usize = 2;

/// A token -> valence table in the VADER lexicon format.
///
/// Each line is `token<TAB>mean<TAB>...`; only the first two columns are
/// read.
#[derive(Clone, Debug, Default)]
pub struct SentimentLexicon {
	valences: HashMap<String, f64>,
	/// Length in chars of the longest entry, caps the search window.
	longest: usize,
}

impl SentimentLexicon {
	/// Loads a lexicon file (plain or gzip). Malformed lines are skipped.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SlithyError> {
		let lines = read_lines(path)?;
		Ok(Self::from_entries(lines.iter().filter_map(|line| {
			let mut columns = line.split('\t');
			let token = columns.next()?.trim();
			let valence = columns.next()?.trim().parse::<f64>().ok()?;
			Some((token, valence))
		})))
	}

	pub fn from_entries<I, S>(entries: I) -> Self
	where
		I: IntoIterator<Item = (S, f64)>,
		S: AsRef<str>,
	{
		let mut lexicon = Self::default();
		for (token, valence) in entries {
			let token = token.as_ref().to_lowercase();
			if token.is_empty() {
				continue;
			}
			lexicon.longest = lexicon.longest.max(token.chars().count());
			lexicon.valences.insert(token, valence);
		}
		lexicon
	}

	pub fn len(&self) -> usize {
		self.valences.len()
	}

	pub fn is_empty(&self) -> bool {
		self.valences.is_empty()
	}

	/// Scores a (possibly invented) word in `[0, 1]`.
	///
	/// Scans left to right; at each position takes the longest lexicon
	/// entry of at least two letters starting there, then jumps past it.
	/// Positions with no match advance by one letter. The mean valence of
	/// all fragments found is mapped from `[-4, 4]` to `[0, 1]`.
	///
	/// Returns [`NEUTRAL`] when no fragment matches.
	pub fn score(&self, word: &str) -> f64 {
		let letters: Vec<char> = word.to_lowercase().chars().collect();
		let mut found = Vec::new();
		let mut i = 0;

		while i < letters.len() {
			let longest_end = letters.len().min(i + self.longest);
			let matched = (i + MIN_FRAGMENT..=longest_end).rev().find_map(|end| {
				let fragment: String = letters[i..end].iter().collect();
				self.valences.get(&fragment).map(|valence| (end - i, *valence))
			});

			match matched {
				Some((len, valence)) => {
					found.push(valence);
					i += len;
				}
				None => i += 1,
			}
		}

		if found.is_empty() {
			return NEUTRAL;
		}
		let mean = found.iter().sum::<f64>() / found.len() as f64;
		(mean + VALENCE_BOUND) / (2.0 * VALENCE_BOUND)
	}
}
