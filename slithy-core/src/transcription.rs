use std::collections::HashMap;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::phoneme::Phoneme;

/// Candidate letters retained per phoneme.
pub const MAX_SPELLINGS: usize = 3;

/// Emitted for a phoneme the table has never seen.
pub const PLACEHOLDER: char = '?';

/// Maps stress-stripped phonemes to their most frequent letters.
///
/// # Alignment heuristic
/// Training only uses words whose letter count equals their phoneme
/// count, and pairs letter `i` with phoneme `i`. This is a rough, lossy
/// approximation of a real grapheme/phoneme alignment: words with silent
/// letters or digraphs (`knight`, `ship`) never contribute, so corpora rich
/// in them produce a sparse table where many phonemes fall back to
/// [`PLACEHOLDER`].
///
/// # Invariants
/// - Keys carry no stress digit
/// - Every entry holds 1 to [`MAX_SPELLINGS`] letters, most frequent first
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TranscriptionTable {
	spellings: HashMap<String, Vec<char>>,
}

impl TranscriptionTable {
	/// Builds the table from corpus words paired with one pronunciation each.
	///
	/// Pairs whose lengths differ are skipped. Letters of equal frequency
	/// keep the order in which they were first observed.
	pub fn build<'a, I>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (&'a str, &'a [Phoneme])>,
	{
		let mut counts: HashMap<String, Vec<(char, usize)>> = HashMap::new();
		let mut aligned = 0usize;
		let mut skipped = 0usize;

		for (word, phonemes) in pairs {
			let letters: Vec<char> = word.chars().collect();
			if letters.len() != phonemes.len() {
				skipped += 1;
				continue;
			}
			aligned += 1;

			for (letter, phoneme) in letters.into_iter().zip(phonemes) {
				let observed = counts.entry(phoneme.base().to_owned()).or_default();
				match observed.iter_mut().find(|(c, _)| *c == letter) {
					Some((_, count)) => *count += 1,
					None => observed.push((letter, 1)),
				}
			}
		}
		log::debug!("transcription alignment: {aligned} pairs used, {skipped} skipped");

		let spellings = counts
			.into_iter()
			.map(|(phoneme, mut letters)| {
				letters.sort_by(|a, b| b.1.cmp(&a.1));
				let ranked = letters.into_iter().take(MAX_SPELLINGS).map(|(c, _)| c).collect();
				(phoneme, ranked)
			})
			.collect();

		Self { spellings }
	}

	/// Ranked letters for a phoneme; the stress digit is ignored.
	pub fn spellings(&self, phoneme: &Phoneme) -> Option<&[char]> {
		self.spellings.get(phoneme.base()).map(Vec::as_slice)
	}

	/// Number of phonemes covered.
	pub fn len(&self) -> usize {
		self.spellings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.spellings.is_empty()
	}

	/// Turns a phoneme sequence into a letter string.
	///
	/// Each phoneme picks one of its ranked letters uniformly at random.
	/// Phonemes missing from the table become [`PLACEHOLDER`] so that a
	/// string is always produced. A phoneme with a single candidate always
	/// yields that letter.
	pub fn transcribe<R: Rng + ?Sized>(&self, phonemes: &[Phoneme], rng: &mut R) -> String {
		phonemes
			.iter()
			.map(|phoneme| {
				self.spellings(phoneme)
					.and_then(|letters| letters.choose(&mut *rng).copied())
					.unwrap_or(PLACEHOLDER)
			})
			.collect()
	}
}
