use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Anything usable as a corpus symbol: letters, phonemes, ...
pub trait Symbol: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Symbol for T {}

/// A generation unit: either a corpus symbol or one of the two sentinels.
///
/// The sentinels are variants of their own, so they never collide with a
/// corpus-derived symbol, whatever the alphabet.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token<T> {
	/// Padding before the first symbol of a sequence.
	Start,
	Symbol(T),
	/// Marks the end of a sequence.
	End,
}

impl<T> Token<T> {
	/// Returns the wrapped symbol, `None` for sentinels.
	pub fn symbol(&self) -> Option<&T> {
		match self {
			Token::Symbol(symbol) => Some(symbol),
			_ => None,
		}
	}
}
