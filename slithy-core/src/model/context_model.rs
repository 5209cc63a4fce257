use std::collections::HashMap;
use std::hash::Hash;
use std::iter;
use std::sync::mpsc;
use std::thread;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::State;
use super::token::{Symbol, Token};
use crate::error::SlithyError;

/// Each CPU gets this many corpus chunks during a parallel build.
const CHUNK_FACTOR: usize = 8;

/// Represents an order-n context model over an arbitrary symbol alphabet.
///
/// The `ContextModel` maps every context of `n-1` tokens observed in the
/// training corpus to the distribution of tokens that followed it. Letters
/// (`ContextModel<char>`) and phonemes (`ContextModel<Phoneme>`) share the
/// same implementation.
///
/// # Responsibilities
/// - Build the model from token sequences, padded with `n-1` `Start`
///   tokens and one `End` token
/// - Accumulate next-token counts per context
/// - Predict the next token given a context
/// - Merge with another model of the same order `n`
///
/// # Invariants
/// - `n` is always >= 2
/// - Every context key holds exactly `n-1` tokens
/// - All next-token counts are >= 1
/// - The model is never mutated once training is over; sharing `&ContextModel`
///   across threads needs no synchronization
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(
	try_from = "RawContextModel<T>",
	bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de> + Eq + Hash")
)]
pub struct ContextModel<T> {
	/// The order of the model (context length + 1)
	n: usize, // must be >= 2

	/// Mapping from a context (length n-1) to its next-token distribution
	states: HashMap<Vec<Token<T>>, State<T>>,
}

/// Decoded form of a [`ContextModel`], checked before use.
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Eq + Hash"))]
struct RawContextModel<T> {
	n: usize,
	states: HashMap<Vec<Token<T>>, State<T>>,
}

impl<T: Eq + Hash> TryFrom<RawContextModel<T>> for ContextModel<T> {
	type Error = SlithyError;

	fn try_from(raw: RawContextModel<T>) -> Result<Self, Self::Error> {
		if raw.n < 2 {
			return Err(SlithyError::InvalidOrder(raw.n));
		}
		if let Some(context) = raw.states.keys().find(|context| context.len() != raw.n - 1) {
			return Err(SlithyError::MalformedModel(format!(
				"context of {} tokens in an order-{} model",
				context.len(),
				raw.n
			)));
		}
		if !raw.states.values().all(State::is_well_formed) {
			return Err(SlithyError::MalformedModel("context with empty or zero-count transitions".into()));
		}
		Ok(Self { n: raw.n, states: raw.states })
	}
}

/// Two models are equal when they have the same order, the same contexts
/// and, per context, the same next tokens in the same order.
impl<T: Symbol> PartialEq for ContextModel<T> {
	fn eq(&self, other: &Self) -> bool {
		self.n == other.n && self.states == other.states
	}
}

impl<T: Symbol> ContextModel<T> {
	/// Creates a new, empty context model of order `n`.
	///
	/// # Errors
	/// Returns an error if `n < 2`.
	pub fn new(n: usize) -> Result<Self, SlithyError> {
		if n < 2 {
			return Err(SlithyError::InvalidOrder(n));
		}
		Ok(Self::empty(n))
	}

	/// `n` must already be validated.
	fn empty(n: usize) -> Self {
		Self { n, states: HashMap::new() }
	}

	/// Builds a model from a sequence of token sequences, one per corpus word.
	///
	/// Deterministic for a fixed traversal order of `sequences`.
	pub fn build<I, S>(sequences: I, n: usize) -> Result<Self, SlithyError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<[T]>,
	{
		let mut model = Self::new(n)?;
		for sequence in sequences {
			model.add_sequence(sequence.as_ref());
		}
		Ok(model)
	}

	/// Splits the corpus into chunks, builds partial models in parallel and
	/// merges them into the final model.
	///
	/// # Behavior
	/// - Splits input sequences into chunks (based on CPU cores * factor).
	/// - Spawns threads to build partial models for each chunk.
	/// - Merges all partial models in chunk order.
	///
	/// # Notes
	/// - Merging in chunk order makes the result equal to [`ContextModel::build`]
	///   over the same sequences, including the first-observed order of every
	///   context's next tokens.
	///
	/// # Errors
	/// Returns an error if `n < 2` or if a worker thread dies before sending
	/// its partial model.
	pub fn build_parallel(sequences: Vec<Vec<T>>, n: usize) -> Result<Self, SlithyError>
	where
		T: Send + 'static,
	{
		let mut final_model = Self::new(n)?;
		if sequences.is_empty() {
			return Ok(final_model);
		}

		let chunks = num_cpus::get() * CHUNK_FACTOR;
		let chunk_size = sequences.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		let mut spawned = 0;
		for (index, chunk) in sequences.chunks(chunk_size).enumerate() {
			let tx = tx.clone();
			let chunk: Vec<Vec<T>> = chunk.to_vec();

			thread::spawn(move || {
				let mut partial_model = ContextModel::empty(n);
				for sequence in &chunk {
					partial_model.add_sequence(sequence);
				}
				// The receiver outlives every sender
				let _ = tx.send((index, partial_model));
			});
			spawned += 1;
		}
		drop(tx);

		let mut partial_models: Vec<(usize, Self)> = rx.iter().collect();
		if partial_models.len() != spawned {
			return Err(SlithyError::WorkerLost { missing: spawned - partial_models.len() });
		}
		partial_models.sort_by_key(|(index, _)| *index);

		for (_, partial_model) in &partial_models {
			final_model.merge(partial_model)?;
		}
		log::debug!(
			"built order-{} model with {} contexts from {} chunks",
			n,
			final_model.len(),
			spawned
		);

		Ok(final_model)
	}

	/// Adds one token sequence (a word, a pronunciation) to the model.
	///
	/// The sequence is padded with `n-1` `Start` tokens and one `End`
	/// token; each window of `n-1` tokens records the token after it.
	/// An empty sequence records `End` after the all-`Start` context.
	pub fn add_sequence(&mut self, symbols: &[T]) {
		let mut padded: Vec<Token<T>> = Vec::with_capacity(symbols.len() + self.n);
		padded.extend(iter::repeat_n(Token::Start, self.n - 1));
		padded.extend(symbols.iter().cloned().map(Token::Symbol));
		padded.push(Token::End);

		for window in padded.windows(self.n) {
			let (context, next) = window.split_at(self.n - 1);
			self.states
				.entry(context.to_vec())
				.or_default()
				.add_transition(next[0].clone());
		}
	}

	/// The order `n` of the model.
	pub fn order(&self) -> usize {
		self.n
	}

	/// Number of distinct contexts observed.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// The context every walk starts from: `n-1` `Start` tokens.
	pub fn start_context(&self) -> Vec<Token<T>> {
		vec![Token::Start; self.n - 1]
	}

	/// Iterates over every observed context.
	pub fn contexts(&self) -> impl Iterator<Item = &[Token<T>]> {
		self.states.keys().map(Vec::as_slice)
	}

	/// Next tokens observed after `context`, with their counts, in
	/// first-observed order.
	///
	/// Returns `None` if the context was never observed.
	pub fn next_tokens(&self, context: &[Token<T>]) -> Option<impl Iterator<Item = (&Token<T>, usize)>> {
		self.states.get(context).map(State::transitions)
	}

	/// How many times `token` followed `context` in the corpus.
	pub fn occurrences(&self, context: &[Token<T>], token: &Token<T>) -> usize {
		self.states.get(context).map_or(0, |state| state.occurrences(token))
	}

	/// Total observations recorded after `context`.
	pub fn total(&self, context: &[Token<T>]) -> usize {
		self.states.get(context).map_or(0, State::total)
	}

	/// Draws the next token after `context`, proportionally to its count.
	///
	/// Returns `None` if the context is unknown (a dead end).
	pub fn predict<R: Rng + ?Sized>(&self, context: &[Token<T>], rng: &mut R) -> Option<&Token<T>> {
		self.states.get(context)?.predict(rng)
	}

	/// Merges another context model into this one.
	///
	/// # Notes
	/// - Both models must have the same order `n`.
	/// - Occurrence counts for matching contexts and tokens are summed.
	///
	/// # Errors
	/// Returns an error if the model orders do not match.
	pub fn merge(&mut self, other: &Self) -> Result<(), SlithyError> {
		if self.n != other.n {
			return Err(SlithyError::OrderMismatch { expected: self.n, found: other.n });
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state);
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn letters(words: &[&str]) -> Vec<Vec<char>> {
		words.iter().map(|w| w.chars().collect()).collect()
	}

	#[test]
	fn rejects_order_below_two() {
		assert!(matches!(ContextModel::<char>::new(1), Err(SlithyError::InvalidOrder(1))));
		assert!(ContextModel::<char>::new(2).is_ok());
	}

	#[test]
	fn every_context_has_n_minus_one_tokens() {
		let corpus = letters(&["a", "banana", "kiwi", ""]);
		for n in 2..=5 {
			let model = ContextModel::build(&corpus, n).unwrap();
			assert!(!model.is_empty());
			assert!(model.contexts().all(|context| context.len() == n - 1));
		}
	}

	#[test]
	fn padding_and_counts_for_trigrams() {
		let model = ContextModel::build(letters(&["cat", "cot", "car"]), 3).unwrap();
		let start = model.start_context();
		let c = Token::Symbol('c');
		let a = Token::Symbol('a');

		assert_eq!(start, vec![Token::Start, Token::Start]);
		assert_eq!(model.occurrences(&start, &c), 3);
		assert_eq!(model.total(&start), 3);
		assert_eq!(model.occurrences(&[Token::Start, c.clone()], &a), 2);
		assert_eq!(model.occurrences(&[Token::Start, c.clone()], &Token::Symbol('o')), 1);
		assert_eq!(model.occurrences(&[a.clone(), Token::Symbol('t')], &Token::End), 1);
		// [^^] [^c] [ca] [co] [at] [ot] [ar]
		assert_eq!(model.len(), 7);
	}

	#[test]
	fn next_tokens_keep_first_observed_order() {
		let model = ContextModel::build(letters(&["ab", "ac", "ab"]), 2).unwrap();
		let after_a: Vec<_> = model
			.next_tokens(&[Token::Symbol('a')])
			.unwrap()
			.map(|(token, count)| (token.clone(), count))
			.collect();
		assert_eq!(after_a, vec![(Token::Symbol('b'), 2), (Token::Symbol('c'), 1)]);
		assert!(model.next_tokens(&[Token::Symbol('z')]).is_none());
	}

	#[test]
	fn parallel_build_equals_sequential_build() {
		let words: Vec<String> = (0..500)
			.map(|i| format!("w{}x{}y", i % 17, i % 5))
			.collect();
		let corpus: Vec<Vec<char>> = words.iter().map(|w| w.chars().collect()).collect();

		let sequential = ContextModel::build(&corpus, 3).unwrap();
		let parallel = ContextModel::build_parallel(corpus, 3).unwrap();
		assert_eq!(sequential, parallel);
	}

	#[test]
	fn parallel_build_of_empty_corpus_is_empty() {
		let model = ContextModel::<char>::build_parallel(Vec::new(), 3).unwrap();
		assert!(model.is_empty());
		assert!(ContextModel::<char>::build_parallel(Vec::new(), 0).is_err());
	}

	#[test]
	fn decoding_checks_order_and_context_length() {
		let raw = |n: usize, contexts: Vec<Vec<Token<char>>>| RawContextModel {
			n,
			states: contexts
				.into_iter()
				.map(|context| {
					let mut state = State::default();
					state.add_transition(Token::End);
					(context, state)
				})
				.collect(),
		};

		let zero = ContextModel::try_from(raw(0, Vec::new()));
		assert!(matches!(zero, Err(SlithyError::InvalidOrder(0))));

		let short_key = ContextModel::try_from(raw(3, vec![vec![Token::Start]]));
		assert!(matches!(short_key, Err(SlithyError::MalformedModel(_))));

		let empty_state = RawContextModel::<char> {
			n: 2,
			states: HashMap::from([(vec![Token::Start], State::default())]),
		};
		assert!(matches!(ContextModel::try_from(empty_state), Err(SlithyError::MalformedModel(_))));

		let model = ContextModel::try_from(raw(3, vec![vec![Token::Start, Token::Start]])).unwrap();
		assert_eq!(model.order(), 3);
		assert_eq!(model.total(&model.start_context()), 1);
	}

	#[test]
	fn merge_requires_same_order() {
		let mut left = ContextModel::build(letters(&["ab"]), 2).unwrap();
		let right = ContextModel::build(letters(&["ab"]), 3).unwrap();
		assert!(matches!(
			left.merge(&right),
			Err(SlithyError::OrderMismatch { expected: 2, found: 3 })
		));
	}

	#[test]
	fn merge_sums_overlapping_contexts() {
		let mut left = ContextModel::build(letters(&["ab"]), 2).unwrap();
		let right = ContextModel::build(letters(&["ab", "b"]), 2).unwrap();
		left.merge(&right).unwrap();
		assert_eq!(left.occurrences(&[Token::Start], &Token::Symbol('a')), 2);
		assert_eq!(left.occurrences(&[Token::Start], &Token::Symbol('b')), 1);
		assert_eq!(left.occurrences(&[Token::Symbol('b')], &Token::End), 3);
	}
}
