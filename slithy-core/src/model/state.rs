use rand::Rng;

use serde::{Deserialize, Serialize};

use super::token::{Symbol, Token};

/// Represents the next-token distribution of one context in a context model.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate next-token occurrences during learning
/// - Predict the next token using weighted random sampling
/// - Merge with the distribution of the same context from another model
///
/// ## Invariants
/// - Each next token appears at most once in `transitions`
/// - Each occurrence count is strictly positive
/// - Transitions keep the order in which tokens were first observed, so a
///   fixed random source always maps to the same token
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct State<T> {
	/// Observed next tokens with their occurrence counts.
	/// Example: [(Symbol('a'), 42), (End, 3)]
	transitions: Vec<(Token<T>, usize)>,
}

impl<T> Default for State<T> {
	fn default() -> Self {
		Self { transitions: Vec::new() }
	}
}

impl<T> State<T> {
	/// At least one transition, and no zero count.
	pub(crate) fn is_well_formed(&self) -> bool {
		!self.transitions.is_empty() && self.transitions.iter().all(|(_, count)| *count > 0)
	}
}

impl<T: Symbol> State<T> {
	/// Records one occurrence of `next`.
	pub(crate) fn add_transition(&mut self, next: Token<T>) {
		self.add_occurrences(next, 1);
	}

	/// Records `occurrences` observations of `next`.
	///
	/// - If the token was already observed, its count is increased.
	/// - Otherwise it is appended with the given count.
	fn add_occurrences(&mut self, next: Token<T>, occurrences: usize) {
		match self.transitions.iter_mut().find(|(token, _)| *token == next) {
			Some((_, count)) => *count += occurrences,
			None => self.transitions.push((next, occurrences)),
		}
	}

	/// Total number of observations in this context.
	pub(crate) fn total(&self) -> usize {
		self.transitions.iter().map(|(_, occurrence)| occurrence).sum()
	}

	/// How many times `token` followed this context.
	pub(crate) fn occurrences(&self, token: &Token<T>) -> usize {
		self.transitions
			.iter()
			.find(|(t, _)| t == token)
			.map_or(0, |(_, count)| *count)
	}

	pub(crate) fn transitions(&self) -> impl Iterator<Item = (&Token<T>, usize)> {
		self.transitions.iter().map(|(token, count)| (token, *count))
	}

	/// Predicts the next token using weighted random sampling.
	///
	/// The probability of selecting a token is proportional to its
	/// occurrence count.
	///
	/// This method performs:
	/// - an O(n) scan over the transitions
	/// - a cumulative subtraction to select a bucket
	///
	/// Returns `None` if the state has no transitions.
	pub(crate) fn predict<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Token<T>> {
		let total = self.total();
		if total == 0 {
			return None;
		}

		let mut r = rng.random_range(0..total);
		for (token, occurrence) in &self.transitions {
			if r < *occurrence {
				return Some(token);
			}
			r -= occurrence;
		}

		None
	}

	/// Merges the distribution of the same context from another model.
	///
	/// Occurrence counts are summed; tokens unknown here are appended in
	/// the other state's order.
	pub(crate) fn merge(&mut self, other: &Self) {
		for (token, occurrences) in &other.transitions {
			self.add_occurrences(token.clone(), *occurrences);
		}
	}
}
