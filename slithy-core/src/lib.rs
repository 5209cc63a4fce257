//! Statistical word synthesis library.
//!
//! This crate learns the shape of words from a corpus and synthesizes new,
//! word-like strings from it:
//! - Order-n context models over letters or phonemes
//! - A bounded random walk over those models
//! - Rhyme signatures extracted from stress-annotated pronunciations
//! - Phoneme-to-letter transcription learned from an aligned corpus
//! - Bounded-retry generation pipelines with an external validation filter
//!
//! Lexicon lookups, word filters and persisted artifacts are exposed as
//! explicit objects; nothing is held in global state.

/// Context models, tokens and the constrained sampler.
pub mod model;

/// Stress-annotated phoneme symbols.
pub mod phoneme;

/// Rhyme signature extraction.
pub mod rhyme;

/// Phoneme-to-letter transcription table.
pub mod transcription;

/// Pronunciation lookup (CMU pronouncing dictionary format).
pub mod lexicon;

/// Candidate validation: patterns, word lists, sentiment, pronounceability.
pub mod filter;

/// Generation pipelines and model training.
pub mod synthesis;

/// Binary persistence of trained artifacts.
pub mod store;

/// Data directory layout and user settings.
pub mod config;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (corpus reading, gzip detection).
///
/// Not exposed, only the corpus helpers are re-exported.
pub(crate) mod io;

pub use error::SlithyError;
pub use io::{read_corpus, write_lines};
