use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by model building, persistence and the generation pipelines.
///
/// Sampling dead ends are not errors: the sampler returns `None` and the
/// retry loop moves on. A shortfall is reported through
/// [`Generation`](crate::synthesis::Generation), not through this type.
#[derive(Debug, Error)]
pub enum SlithyError {
	/// A persisted model is missing or cannot be decoded.
	#[error("model unavailable at {}: {reason}", path.display())]
	ModelUnavailable { path: PathBuf, reason: String },

	/// The pronouncing dictionary file is missing or unreadable.
	#[error("pronouncing dictionary unavailable at {}: {reason}", path.display())]
	LexiconUnavailable { path: PathBuf, reason: String },

	/// The target word has no known pronunciation.
	#[error("no pronunciation known for '{0}'")]
	LexiconMiss(String),

	/// The pronunciation of the target word has no stressed vowel.
	#[error("'{0}' has no stressed vowel to rhyme on")]
	NoRhymeSignature(String),

	#[error("context model order must be >= 2, got {0}")]
	InvalidOrder(usize),

	/// A decoded model breaks the shape every trained model has.
	#[error("malformed model: {0}")]
	MalformedModel(String),

	#[error("order mismatch: expected {expected}, found {found}")]
	OrderMismatch { expected: usize, found: usize },

	/// A model building worker exited without delivering its partial model.
	#[error("{missing} model building worker(s) did not report back")]
	WorkerLost { missing: usize },

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error("codec error: {0}")]
	Codec(#[from] postcard::Error),

	#[error("invalid pattern: {0}")]
	Pattern(#[from] regex::Error),

	#[error("invalid settings: {0}")]
	Config(#[from] serde_json::Error),
}
