//! Word synthesis pipelines.
//!
//! Two pipelines share one bounded-retry loop:
//! - free generation walks a letter model under length bounds;
//! - rhyme generation walks a phonetic model, appends the target's rhyme
//!   signature and transcribes the phonemes back to letters.
//!
//! Every attempt is independent. The only state carried between attempts is
//! the list of accepted words, and the attempt budget guarantees termination
//! even when the constraints cannot be met.

use std::collections::{BTreeSet, HashSet};

use rand::Rng;

use crate::config::{DataPaths, Settings};
use crate::error::SlithyError;
use crate::filter::ValidationFilter;
use crate::lexicon::PhoneticLexicon;
use crate::model::{ContextModel, Limit, sample, sample_with_suffix};
use crate::phoneme::{Phoneme, Pronunciation};
use crate::rhyme::RhymeSignature;
use crate::store;
use crate::transcription::TranscriptionTable;

/// Outcome of a bounded generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generation {
	/// Accepted words, in acceptance order, without duplicates.
	pub words: Vec<String>,
	/// How many words were asked for.
	pub requested: usize,
	/// How many attempts were spent.
	pub attempts: usize,
}

impl Generation {
	/// Requested words that could not be delivered within the budget.
	pub fn shortfall(&self) -> usize {
		self.requested.saturating_sub(self.words.len())
	}

	pub fn is_complete(&self) -> bool {
		self.shortfall() == 0
	}
}

/// Parameters of the free generation pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
	pub count: usize,
	pub min_len: usize,
	pub max_len: usize,
	pub attempts_per_word: usize,
}

impl GenerateOptions {
	pub fn new(count: usize, min_len: usize, max_len: usize) -> Self {
		Self {
			count,
			min_len,
			max_len,
			attempts_per_word: Settings::default().attempts_per_word,
		}
	}

	pub fn from_settings(settings: &Settings) -> Self {
		Self {
			count: settings.count,
			min_len: settings.min_len,
			max_len: settings.max_len,
			attempts_per_word: settings.attempts_per_word,
		}
	}

	/// Total attempt budget: `count * attempts_per_word`.
	pub fn max_attempts(&self) -> usize {
		self.count.saturating_mul(self.attempts_per_word)
	}
}

/// Parameters of the rhyme generation pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RhymeOptions {
	pub count: usize,
	/// Phonemes drawn before the signature is appended
	pub steps: usize,
	pub attempts_per_word: usize,
}

impl RhymeOptions {
	pub fn new(count: usize) -> Self {
		let defaults = Settings::default();
		Self {
			count,
			steps: defaults.phonetic_steps,
			attempts_per_word: defaults.rhyme_attempts_per_word,
		}
	}

	pub fn from_settings(settings: &Settings) -> Self {
		Self {
			count: settings.count,
			steps: settings.phonetic_steps,
			attempts_per_word: settings.rhyme_attempts_per_word,
		}
	}

	/// Total attempt budget: `count * attempts_per_word`.
	pub fn max_attempts(&self) -> usize {
		self.count.saturating_mul(self.attempts_per_word)
	}
}

/// Runs `attempt` until `count` distinct, accepted words are collected or
/// `max_attempts` attempts are spent, whichever comes first.
///
/// # Behavior
/// - `attempt` returning `None` (dead end, out-of-range length) consumes one
///   attempt and is otherwise ignored.
/// - Candidates already produced are discarded before the filter runs.
/// - A shortfall is logged as a warning and reported in the result.
pub fn generate_bounded<F, V>(count: usize, max_attempts: usize, filter: &V, mut attempt: F) -> Generation
where
	F: FnMut() -> Option<String>,
	V: ValidationFilter + ?Sized,
{
	let mut words = Vec::new();
	let mut produced: HashSet<String> = HashSet::new();
	let mut attempts = 0;

	while words.len() < count && attempts < max_attempts {
		attempts += 1;
		let Some(candidate) = attempt() else {
			continue;
		};
		if produced.contains(&candidate) {
			log::debug!("attempt {attempts}: '{candidate}' already produced");
			continue;
		}
		if !filter.accept(&candidate) {
			log::debug!("attempt {attempts}: '{candidate}' rejected");
			continue;
		}
		produced.insert(candidate.clone());
		words.push(candidate);
	}

	let generation = Generation { words, requested: count, attempts };
	if !generation.is_complete() {
		log::warn!(
			"only {}/{} words produced after {} attempts",
			generation.words.len(),
			count,
			attempts
		);
	}
	generation
}

/// Free generation: samples words from a letter model.
///
/// Each attempt walks the model with a `max_len` cap; results shorter than
/// `min_len` are discarded. With `min_len > max_len`, no attempt can succeed
/// and the run ends on the attempt budget.
pub fn generate_words<V, R>(
	model: &ContextModel<char>,
	options: &GenerateOptions,
	filter: &V,
	rng: &mut R,
) -> Generation
where
	V: ValidationFilter + ?Sized,
	R: Rng + ?Sized,
{
	let limit = Limit::MaxLength(options.max_len);
	let lengths = options.min_len..=options.max_len;
	generate_bounded(options.count, options.max_attempts(), filter, || {
		let letters = sample(model, limit, &mut *rng)?;
		lengths
			.contains(&letters.len())
			.then(|| letters.into_iter().collect())
	})
}

/// A resolved rhyme target: the word, its first pronunciation and the
/// signature every generated word will end with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RhymeTarget {
	pub word: String,
	pub pronunciation: Pronunciation,
	pub signature: RhymeSignature,
}

impl RhymeTarget {
	/// Looks up `word` and extracts its rhyme signature.
	///
	/// # Errors
	/// - [`SlithyError::LexiconMiss`] if the word has no pronunciation
	/// - [`SlithyError::NoRhymeSignature`] if it has no stressed vowel
	pub fn resolve<L>(lexicon: &L, word: &str) -> Result<Self, SlithyError>
	where
		L: PhoneticLexicon + ?Sized,
	{
		let word = word.trim().to_lowercase();
		let pronunciation = lexicon
			.first_pronunciation(&word)
			.ok_or_else(|| SlithyError::LexiconMiss(word.clone()))?
			.to_vec();
		let signature =
			RhymeSignature::extract(&pronunciation).ok_or_else(|| SlithyError::NoRhymeSignature(word.clone()))?;
		Ok(Self { word, pronunciation, signature })
	}
}

/// The two pre-trained artifacts of the rhyme pipeline.
#[derive(Clone, Debug)]
pub struct RhymeModels {
	pub phonetic: ContextModel<Phoneme>,
	pub transcription: TranscriptionTable,
}

impl RhymeModels {
	/// Loads both artifacts from the data directory.
	///
	/// # Errors
	/// Returns [`SlithyError::ModelUnavailable`] naming the first artifact
	/// that is missing or undecodable.
	pub fn load(paths: &DataPaths) -> Result<Self, SlithyError> {
		let phonetic = store::load(paths.phonetic_model())?;
		let transcription = store::load(paths.transcription_model())?;
		Ok(Self { phonetic, transcription })
	}
}

/// Rhyme generation for an already resolved target.
///
/// Each attempt draws up to `options.steps` phonemes, appends the target's
/// signature and transcribes the result.
pub fn generate_rhymes<V, R>(
	target: &RhymeTarget,
	models: &RhymeModels,
	options: &RhymeOptions,
	filter: &V,
	rng: &mut R,
) -> Generation
where
	V: ValidationFilter + ?Sized,
	R: Rng + ?Sized,
{
	generate_bounded(options.count, options.max_attempts(), filter, || {
		let phonemes = sample_phonetic(target, models, options.steps, &mut *rng)?;
		Some(models.transcription.transcribe(&phonemes, &mut *rng))
	})
}

/// One phonetic walk ending in the target's signature, before transcription.
pub fn sample_phonetic<R: Rng + ?Sized>(
	target: &RhymeTarget,
	models: &RhymeModels,
	steps: usize,
	rng: &mut R,
) -> Option<Vec<Phoneme>> {
	sample_with_suffix(&models.phonetic, steps, target.signature.phonemes(), rng)
}

/// The full rhyme pipeline, failing fast in this order: unknown word,
/// missing signature, missing models.
pub fn rhyme_pipeline<L, V, R>(
	lexicon: &L,
	word: &str,
	paths: &DataPaths,
	options: &RhymeOptions,
	filter: &V,
	rng: &mut R,
) -> Result<Generation, SlithyError>
where
	L: PhoneticLexicon + ?Sized,
	V: ValidationFilter + ?Sized,
	R: Rng + ?Sized,
{
	let target = RhymeTarget::resolve(lexicon, word)?;
	log::info!("rhyming with '{}' on [{}]", target.word, target.signature);
	let models = RhymeModels::load(paths)?;
	Ok(generate_rhymes(&target, &models, options, filter, rng))
}

/// Trains the letter model of the free generation pipeline.
pub fn train_letter_model(corpus: &[String], n: usize) -> Result<ContextModel<char>, SlithyError> {
	let sequences: Vec<Vec<char>> = corpus.iter().map(|word| word.chars().collect()).collect();
	let model = ContextModel::build_parallel(sequences, n)?;
	log::info!("trained order-{} letter model: {} contexts from {} words", n, model.len(), corpus.len());
	Ok(model)
}

/// Trains a phonetic model from the first pronunciation of every corpus
/// word the lexicon knows. Unknown words are skipped.
pub fn train_phonetic_model<L>(corpus: &[String], lexicon: &L, n: usize) -> Result<ContextModel<Phoneme>, SlithyError>
where
	L: PhoneticLexicon + ?Sized,
{
	let sequences: Vec<Vec<Phoneme>> = corpus
		.iter()
		.filter_map(|word| lexicon.first_pronunciation(word).map(<[Phoneme]>::to_vec))
		.collect();
	log::debug!("{} of {} corpus words have no pronunciation", corpus.len() - sequences.len(), corpus.len());

	let known = sequences.len();
	let model = ContextModel::build_parallel(sequences, n)?;
	log::info!("trained order-{} phonetic model: {} contexts from {} pronunciations", n, model.len(), known);
	Ok(model)
}

/// Trains the phoneme-to-letter table from corpus words and their first
/// pronunciation.
pub fn train_transcription_table<L>(corpus: &[String], lexicon: &L) -> TranscriptionTable
where
	L: PhoneticLexicon + ?Sized,
{
	let pairs = corpus
		.iter()
		.filter_map(|word| Some((word.as_str(), lexicon.first_pronunciation(word)?)));
	let table = TranscriptionTable::build(pairs);
	log::info!("trained transcription table covering {} phonemes", table.len());
	table
}

/// Keeps alphabetic words with a known pronunciation, deduplicated and sorted.
pub fn purify_corpus<L>(words: &[String], lexicon: &L) -> Vec<String>
where
	L: PhoneticLexicon + ?Sized,
{
	let purified: BTreeSet<&str> = words
		.iter()
		.map(String::as_str)
		.filter(|word| !word.is_empty() && word.chars().all(char::is_alphabetic))
		.filter(|word| lexicon.pronunciations(word).is_some())
		.collect();
	purified.into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::lexicon::CmuDict;
	use crate::phoneme::parse_pronunciation;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn accept_all(_: &str) -> bool {
		true
	}

	fn corpus(words: &[&str]) -> Vec<String> {
		words.iter().map(|w| w.to_string()).collect()
	}

	fn lexicon() -> CmuDict {
		CmuDict::from_entries([
			("cat", parse_pronunciation("K AE1 T")),
			("bat", parse_pronunciation("B AE1 T")),
			("hello", parse_pronunciation("HH AH0 L OW1")),
			("the", parse_pronunciation("DH AH0")),
			("mat", parse_pronunciation("M AE1 T")),
		])
	}

	#[test]
	fn bounded_retry_stops_when_count_reached() {
		let mut next = 0;
		let generation = generate_bounded(3, 300, &accept_all, || {
			next += 1;
			Some(format!("w{next}"))
		});
		assert_eq!(generation.words, vec!["w1", "w2", "w3"]);
		assert_eq!(generation.attempts, 3);
		assert!(generation.is_complete());
	}

	#[test]
	fn bounded_retry_dedups_and_filters() {
		let candidates = ["aa", "bb", "aa", "cc", "dd"];
		let mut iter = candidates.iter();
		let reject_cc = |w: &str| w != "cc";
		let generation = generate_bounded(10, candidates.len(), &reject_cc, || iter.next().map(|w| w.to_string()));
		assert_eq!(generation.words, vec!["aa", "bb", "dd"]);
		assert_eq!(generation.attempts, 5);
		assert_eq!(generation.shortfall(), 7);
	}

	#[test]
	fn bounded_retry_never_loops_forever() {
		let generation = generate_bounded(4, 400, &accept_all, || None);
		assert_eq!(generation.attempts, 400);
		assert_eq!(generation.shortfall(), 4);

		let generation = generate_bounded(0, 0, &accept_all, || Some("x".into()));
		assert!(generation.is_complete());
		assert_eq!(generation.attempts, 0);
	}

	#[test]
	fn free_generation_respects_length_bounds() {
		let corpus = corpus(&["jabberwock", "vorpal", "frumious", "bandersnatch", "tumtum", "manxome"]);
		let model = train_letter_model(&corpus, 2).unwrap();
		let options = GenerateOptions::new(5, 4, 7);
		let mut rng = StdRng::seed_from_u64(8);

		let generation = generate_words(&model, &options, &accept_all, &mut rng);
		for word in &generation.words {
			let len = word.chars().count();
			assert!((4..=7).contains(&len), "{word}");
		}
	}

	#[test]
	fn impossible_bounds_end_in_shortfall() {
		let model = train_letter_model(&corpus(&["cat", "cot", "car"]), 3).unwrap();
		let options = GenerateOptions::new(2, 6, 3);
		let mut rng = StdRng::seed_from_u64(1);

		let generation = generate_words(&model, &options, &accept_all, &mut rng);
		assert!(generation.words.is_empty());
		assert_eq!(generation.attempts, options.max_attempts());
		assert_eq!(generation.attempts, 200);
		assert_eq!(generation.shortfall(), 2);
	}

	#[test]
	fn resolve_target_and_its_failures() {
		let lexicon = lexicon();
		let target = RhymeTarget::resolve(&lexicon, " Cat ").unwrap();
		assert_eq!(target.word, "cat");
		assert_eq!(target.signature.to_string(), "AE1 T");

		assert!(matches!(RhymeTarget::resolve(&lexicon, "dog"), Err(SlithyError::LexiconMiss(w)) if w == "dog"));
		assert!(matches!(RhymeTarget::resolve(&lexicon, "the"), Err(SlithyError::NoRhymeSignature(_))));
	}

	#[test]
	fn pipeline_fails_fast_before_loading_models() {
		let dir = tempfile::tempdir().unwrap();
		let paths = DataPaths::new(dir.path());
		let options = RhymeOptions::new(3);
		let mut rng = StdRng::seed_from_u64(0);
		let lexicon = lexicon();

		let miss = rhyme_pipeline(&lexicon, "dog", &paths, &options, &accept_all, &mut rng);
		assert!(matches!(miss, Err(SlithyError::LexiconMiss(_))));

		let no_models = rhyme_pipeline(&lexicon, "cat", &paths, &options, &accept_all, &mut rng);
		assert!(matches!(no_models, Err(SlithyError::ModelUnavailable { .. })));
	}

	#[test]
	fn phonetic_training_skips_unknown_words() {
		let lexicon = lexicon();
		let model = train_phonetic_model(&corpus(&["cat", "zzyzx", "bat"]), &lexicon, 3).unwrap();
		let start = model.start_context();
		assert_eq!(model.total(&start), 2);
	}

	#[test]
	fn purify_keeps_known_alphabetic_words() {
		let lexicon = lexicon();
		let words = corpus(&["mat", "cat", "cat", "c4t", "dog", "bat"]);
		assert_eq!(purify_corpus(&words, &lexicon), vec!["bat", "cat", "mat"]);
	}
}
