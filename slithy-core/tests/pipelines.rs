use rand::SeedableRng;
use rand::rngs::StdRng;

use slithy_core::config::DataPaths;
use slithy_core::filter::{ValidationFilter, WordValidator};
use slithy_core::lexicon::CmuDict;
use slithy_core::model::{Limit, sample};
use slithy_core::phoneme::{Phoneme, parse_pronunciation};
use slithy_core::store;
use slithy_core::synthesis::{
	GenerateOptions, RhymeModels, RhymeOptions, RhymeTarget, generate_rhymes, generate_words, rhyme_pipeline,
	sample_phonetic, train_letter_model, train_phonetic_model, train_transcription_table,
};
use slithy_core::SlithyError;

fn words(list: &[&str]) -> Vec<String> {
	list.iter().map(|w| w.to_string()).collect()
}

fn accept_all(_: &str) -> bool {
	true
}

/// Three-letter words whose phonemes align one to one with their letters.
fn rhyme_lexicon() -> CmuDict {
	CmuDict::from_entries([
		("cat", parse_pronunciation("K AE1 T")),
		("bat", parse_pronunciation("B AE1 T")),
		("mat", parse_pronunciation("M AE1 T")),
		("hat", parse_pronunciation("HH AE1 T")),
		("sat", parse_pronunciation("S AE1 T")),
		("tab", parse_pronunciation("T AE1 B")),
		("map", parse_pronunciation("M AE1 P")),
		("rap", parse_pronunciation("R AE1 P")),
		("the", parse_pronunciation("DH AH0")),
	])
}

fn rhyme_corpus() -> Vec<String> {
	words(&["cat", "bat", "mat", "hat", "sat", "tab", "map", "rap"])
}

#[test]
fn seeded_letter_sampling_is_reproducible() {
	let model = train_letter_model(&words(&["cat", "cot", "car"]), 3).unwrap();

	let draw = |seed: u64| {
		let mut rng = StdRng::seed_from_u64(seed);
		(0..25)
			.map(|_| sample(&model, Limit::MaxLength(5), &mut rng).map(|l| l.into_iter().collect::<String>()))
			.collect::<Vec<_>>()
	};

	let first = draw(17);
	assert_eq!(first, draw(17));
	for word in first.iter().flatten() {
		assert!(word.chars().count() <= 5);
		assert!(["cat", "cot", "car"].contains(&word.as_str()), "{word}");
	}

	let mut rng = StdRng::seed_from_u64(17);
	for _ in 0..25 {
		let letters = sample(&model, Limit::MaxLength(2), &mut rng).unwrap();
		assert!(letters.len() <= 2);
	}
}

#[test]
fn accepted_words_stay_within_bounds() {
	let corpus = words(&[
		"brillig", "slithy", "toves", "gyre", "gimble", "wabe", "mimsy", "borogoves", "mome", "raths", "outgrabe",
	]);
	let model = train_letter_model(&corpus, 2).unwrap();
	let options = GenerateOptions::new(10, 3, 6);
	let mut rng = StdRng::seed_from_u64(99);

	let generation = generate_words(&model, &options, &accept_all, &mut rng);
	assert!(generation.attempts <= options.max_attempts());
	for word in &generation.words {
		let len = word.chars().count();
		assert!((3..=6).contains(&len), "{word} has {len} letters");
	}
}

#[test]
fn rich_corpus_finishes_before_the_budget() {
	let corpus = words(&[
		"amber", "banter", "candle", "dapper", "ember", "fender", "garden", "hamper", "jester", "kindle", "lantern",
		"mender", "nectar", "oyster", "pander", "quiver", "ranger", "sender", "tender", "umber", "vendor", "winter",
		"yonder", "zephyr", "bramble", "crumble", "dimple", "fumble", "grumble", "humble", "jumble", "mumble",
		"nimble", "rumble", "simple", "tumble", "wimple",
	]);
	let model = train_letter_model(&corpus, 3).unwrap();
	let corpus_set = corpus.iter().cloned().collect();
	let validator = WordValidator::new().with_corpus(corpus_set, false);
	let options = GenerateOptions::new(5, 4, 10);
	let mut rng = StdRng::seed_from_u64(2026);

	let generation = generate_words(&model, &options, &validator, &mut rng);
	assert!(generation.is_complete(), "shortfall of {}", generation.shortfall());
	assert!(generation.attempts < options.max_attempts());
	for word in &generation.words {
		assert!(validator.accept(word));
		assert!(!corpus.contains(word));
	}
}

#[test]
fn unsatisfiable_constraints_report_a_shortfall() {
	let model = train_letter_model(&words(&["cat", "cot", "car"]), 3).unwrap();
	let mut rng = StdRng::seed_from_u64(5);

	let inverted = GenerateOptions::new(3, 8, 4);
	let generation = generate_words(&model, &inverted, &accept_all, &mut rng);
	assert_eq!(generation.attempts, 300);
	assert_eq!(generation.shortfall(), 3);

	let impossible = WordValidator::new().matching("^q").unwrap();
	let generation = generate_words(&model, &GenerateOptions::new(2, 1, 5), &impossible, &mut rng);
	assert_eq!(generation.attempts, 200);
	assert!(generation.words.is_empty());
}

#[test]
fn rhyme_target_cat() {
	let lexicon = rhyme_lexicon();
	let target = RhymeTarget::resolve(&lexicon, "cat").unwrap();
	assert_eq!(target.pronunciation, parse_pronunciation("K AE1 T"));
	assert_eq!(target.signature.phonemes(), parse_pronunciation("AE1 T").as_slice());

	assert!(matches!(RhymeTarget::resolve(&lexicon, "the"), Err(SlithyError::NoRhymeSignature(_))));
	assert!(matches!(RhymeTarget::resolve(&lexicon, "zzz"), Err(SlithyError::LexiconMiss(_))));
}

#[test]
fn phonetic_candidates_end_with_the_signature() {
	let lexicon = rhyme_lexicon();
	let corpus = rhyme_corpus();
	let models = RhymeModels {
		phonetic: train_phonetic_model(&corpus, &lexicon, 3).unwrap(),
		transcription: train_transcription_table(&corpus, &lexicon),
	};
	let target = RhymeTarget::resolve(&lexicon, "cat").unwrap();
	let suffix = [Phoneme::from("AE1"), Phoneme::from("T")];
	let mut rng = StdRng::seed_from_u64(3);

	for _ in 0..100 {
		let phonemes = sample_phonetic(&target, &models, 10, &mut rng).unwrap();
		assert!(phonemes.ends_with(&suffix), "{phonemes:?}");
		assert!(phonemes.len() <= 10 + suffix.len());
	}

	let generation = generate_rhymes(&target, &models, &RhymeOptions::new(3), &accept_all, &mut rng);
	assert!(generation.is_complete());
	for word in &generation.words {
		// AE and T each have a single learned spelling
		assert!(word.ends_with("at"), "{word}");
		assert!(!word.contains('?'), "{word}");
	}
}

#[test]
fn rhyme_pipeline_from_persisted_models() {
	let dir = tempfile::tempdir().unwrap();
	let paths = DataPaths::new(dir.path());
	let lexicon = rhyme_lexicon();
	let corpus = rhyme_corpus();

	let mut rng = StdRng::seed_from_u64(12);
	let missing = rhyme_pipeline(&lexicon, "cat", &paths, &RhymeOptions::new(2), &accept_all, &mut rng);
	assert!(matches!(missing, Err(SlithyError::ModelUnavailable { .. })));

	store::save(&train_phonetic_model(&corpus, &lexicon, 3).unwrap(), paths.phonetic_model()).unwrap();
	let still_missing = rhyme_pipeline(&lexicon, "cat", &paths, &RhymeOptions::new(2), &accept_all, &mut rng);
	assert!(matches!(still_missing, Err(SlithyError::ModelUnavailable { path, .. }) if path == paths.transcription_model()));

	store::save(&train_transcription_table(&corpus, &lexicon), paths.transcription_model()).unwrap();
	let generation = rhyme_pipeline(&lexicon, "cat", &paths, &RhymeOptions::new(2), &accept_all, &mut rng).unwrap();
	assert_eq!(generation.words.len(), 2);
	assert!(generation.words.iter().all(|w| w.ends_with("at")));
}
