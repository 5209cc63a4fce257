use std::fmt;

use crate::phoneme::{Phoneme, format_pronunciation};

/// The rhyme-relevant tail of a pronunciation.
///
/// Runs from the last vowel carrying primary or secondary stress through
/// the end of the pronunciation.
///
/// # Invariants
/// - Never empty
/// - The first phoneme has stress digit `1` or `2`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RhymeSignature(Vec<Phoneme>);

impl RhymeSignature {
	/// Extracts the signature of `phonemes`.
	///
	/// The rightmost stressed phoneme wins, not the first one:
	/// `HH EH1 L OW0` gives `EH1 L OW0`.
	///
	/// Returns `None` when no phoneme carries stress `1` or `2`, typically
	/// for unstressed monosyllables or malformed input.
	pub fn extract(phonemes: &[Phoneme]) -> Option<Self> {
		let index = phonemes.iter().rposition(Phoneme::is_stressed)?;
		Some(Self(phonemes[index..].to_vec()))
	}

	pub fn phonemes(&self) -> &[Phoneme] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Always `false`, kept for API symmetry with `len`.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for RhymeSignature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&format_pronunciation(&self.0))
	}
}
