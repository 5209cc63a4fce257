use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stress digits that may trail an ARPABET vowel.
const STRESS_DIGITS: [char; 3] = ['0', '1', '2'];

/// A stress-annotated phoneme, e.g. `AE1`, `T`, `AH0`.
///
/// Vowels carry a trailing stress digit: `0` unstressed, `1` primary,
/// `2` secondary. Consonants carry none.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Phoneme(String);

/// One pronunciation variant: phonemes in spoken order.
pub type Pronunciation = Vec<Phoneme>;

impl Phoneme {
	pub fn new(symbol: impl Into<String>) -> Self {
		Self(symbol.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The symbol without its stress digit(s): `EH1` -> `EH`.
	pub fn base(&self) -> &str {
		self.0.trim_end_matches(STRESS_DIGITS)
	}

	/// The trailing stress digit, `None` for consonants.
	pub fn stress(&self) -> Option<u8> {
		match self.0.chars().last()? {
			digit @ '0'..='2' => Some(digit as u8 - b'0'),
			_ => None,
		}
	}

	/// Primary or secondary stress.
	pub fn is_stressed(&self) -> bool {
		matches!(self.stress(), Some(1 | 2))
	}
}

impl fmt::Display for Phoneme {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Phoneme {
	fn from(symbol: &str) -> Self {
		Self::new(symbol)
	}
}

impl FromStr for Phoneme {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::new(s))
	}
}

/// Splits a whitespace-separated pronunciation: `"K AE1 T"`.
pub fn parse_pronunciation(text: &str) -> Pronunciation {
	text.split_whitespace().map(Phoneme::from).collect()
}

/// Joins phonemes with single spaces.
pub fn format_pronunciation(phonemes: &[Phoneme]) -> String {
	phonemes.iter().map(Phoneme::as_str).collect::<Vec<_>>().join(" ")
}
