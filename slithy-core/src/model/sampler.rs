use rand::Rng;

use super::context_model::ContextModel;
use super::token::{Symbol, Token};

/// Where a walk over a context model stops when no `End` token is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Limit {
	/// Stop once this many symbols were emitted (word-shape generation).
	///
	/// Reaching the cap is not a failure: the truncated sequence is
	/// returned and the caller re-checks its length bounds.
	MaxLength(usize),
	/// Stop after this many draws (phonetic generation).
	Steps(usize),
}

/// Walks `model` from its start context and returns the emitted symbols.
///
/// # Behavior
/// - Starts from `n-1` `Start` tokens.
/// - Draws the next token proportionally to its observed count.
/// - Stops on `End`, or when `limit` is reached.
/// - Slides the context window forward by one after every emitted symbol.
///
/// # Returns
/// - `Some(symbols)`, possibly empty
/// - `None` if the walk reached a context the model never observed. This is
///   a dead end for this attempt only; the caller simply retries.
///
/// # Notes
/// - Identical random draws yield identical output.
pub fn sample<T, R>(model: &ContextModel<T>, limit: Limit, rng: &mut R) -> Option<Vec<T>>
where
	T: Symbol,
	R: Rng + ?Sized,
{
	let mut context = model.start_context();
	let mut output = Vec::new();
	let mut steps = 0;

	loop {
		match limit {
			Limit::MaxLength(max_len) if output.len() >= max_len => break,
			Limit::Steps(max_steps) if steps >= max_steps => break,
			_ => (),
		}

		// A sentinel here is `End`: `Start` is only ever padding
		let Some(symbol) = model.predict(&context, rng)?.symbol().cloned() else {
			break;
		};
		steps += 1;

		output.push(symbol.clone());
		context.rotate_left(1);
		if let Some(last) = context.last_mut() {
			*last = Token::Symbol(symbol);
		}
	}

	Some(output)
}

/// Walks `model` for at most `steps` draws, then appends `suffix`.
///
/// The suffix is concatenated unconditionally. Nothing checks that the
/// generated prefix connects plausibly to it: the junction may hold
/// sounds or clusters the corpus never shows.
///
/// Returns `None` on a dead end, like [`sample`].
pub fn sample_with_suffix<T, R>(
	model: &ContextModel<T>,
	steps: usize,
	suffix: &[T],
	rng: &mut R,
) -> Option<Vec<T>>
where
	T: Symbol,
	R: Rng + ?Sized,
{
	let mut output = sample(model, Limit::Steps(steps), rng)?;
	output.extend_from_slice(suffix);
	Some(output)
}
