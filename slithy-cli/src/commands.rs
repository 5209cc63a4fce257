use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use slithy_core::config::{DataPaths, Settings};
use slithy_core::filter::{PronounceabilityModel, SentimentLexicon, WordValidator, load_word_set};
use slithy_core::lexicon::CmuDict;
use slithy_core::model::ContextModel;
use slithy_core::phoneme::format_pronunciation;
use slithy_core::synthesis::{
	GenerateOptions, Generation, RhymeOptions, RhymeTarget, generate_words, purify_corpus, rhyme_pipeline,
	train_letter_model, train_phonetic_model, train_transcription_table,
};
use slithy_core::{SlithyError, read_corpus, store, write_lines};

use crate::{
	BuildPhoneticArgs, BuildTranscriptionArgs, ExportLexiconArgs, GenerateArgs, GlobalArgs, InitConfigArgs,
	PurifyArgs, RhymeArgs, ValidateArgs,
};

fn data_paths(global: &GlobalArgs) -> DataPaths {
	DataPaths::resolve(global.data_dir.as_deref())
}

fn load_lexicon(global: &GlobalArgs, paths: &DataPaths) -> Result<CmuDict> {
	let path = global.cmudict.clone().unwrap_or_else(|| paths.cmudict());
	let lexicon = CmuDict::load(&path)?;
	log::info!("loaded {} pronunciations from {}", lexicon.len(), path.display());
	Ok(lexicon)
}

/// A missing lexicon disables sentiment filtering instead of failing the run.
fn load_sentiment(global: &GlobalArgs, paths: &DataPaths) -> SentimentLexicon {
	let path = global.sentiment_lexicon.clone().unwrap_or_else(|| paths.sentiment_lexicon());
	SentimentLexicon::load(&path).unwrap_or_else(|e| {
		log::warn!("could not read sentiment lexicon {}: {}. Every word scores neutral.", path.display(), e);
		SentimentLexicon::default()
	})
}

fn load_corpus(path: &Path) -> Result<Vec<String>> {
	let corpus = read_corpus(path).with_context(|| format!("failed to read corpus {}", path.display()))?;
	log::info!("read {} words from {}", corpus.len(), path.display());
	Ok(corpus)
}

fn word_list(explicit: Option<PathBuf>, default: PathBuf) -> HashSet<String> {
	load_word_set(explicit.unwrap_or(default))
}

fn make_rng(seed: Option<u64>) -> Box<dyn RngCore> {
	match seed {
		Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
		None => Box::new(rand::rng()),
	}
}

/// Flags given to `generate` that the selected mode does not use.
///
/// Rhyme mode has no letter model and no length bounds; a loaded letter
/// model already has its order.
pub fn ignored_flags(args: &GenerateArgs) -> Vec<&'static str> {
	let rhyming = args.rhyme.is_some();
	[
		("--min-len", rhyming && args.min_len.is_some()),
		("--max-len", rhyming && args.max_len.is_some()),
		("--ngram-size", (rhyming || args.model.is_some()) && args.ngram_size.is_some()),
		("--model", rhyming && args.model.is_some()),
		("--save-model", rhyming && args.save_model.is_some()),
	]
	.into_iter()
	.filter_map(|(flag, ignored)| ignored.then_some(flag))
	.collect()
}

pub fn generate(global: &GlobalArgs, args: GenerateArgs) -> Result<()> {
	let ignored = ignored_flags(&args);
	if !ignored.is_empty() {
		let mode = if args.rhyme.is_some() { "with --rhyme" } else { "with --model" };
		log::warn!("ignoring {} {}", ignored.join(", "), mode);
	}

	let paths = data_paths(global);
	let settings = Settings::load(paths.settings());
	let corpus = load_corpus(&args.corpus)?;

	let wants_sentiment = args.min_sentiment.is_some() || args.max_sentiment.is_some();
	let sentiment = if wants_sentiment { load_sentiment(global, &paths) } else { SentimentLexicon::default() };
	let pronounceability = args.min_pronounceability.map(|_| PronounceabilityModel::train(&corpus));

	let mut validator = WordValidator::new()
		.with_dictionary(word_list(args.dictionary, paths.dictionary()))
		.with_blocklist(word_list(args.blocklist, paths.blocklist()))
		.with_corpus(corpus.iter().cloned().collect(), args.allow_corpus_words)
		.with_sentiment(&sentiment, args.min_sentiment, args.max_sentiment);
	if let Some(pattern) = &args.matches_regex {
		validator = validator.matching(pattern)?;
	}
	if let Some(pattern) = &args.reject_regex {
		validator = validator.rejecting(pattern)?;
	}
	if let (Some(model), Some(floor)) = (&pronounceability, args.min_pronounceability) {
		validator = validator.with_pronounceability(model, floor);
	}

	let mut rng = make_rng(args.seed);
	let count = args.count.unwrap_or(settings.count);

	let generation = match &args.rhyme {
		Some(word) => {
			let lexicon = load_lexicon(global, &paths)?;
			let options = RhymeOptions { count, ..RhymeOptions::from_settings(&settings) };
			rhyme_pipeline(&lexicon, word, &paths, &options, &validator, &mut *rng)?
		}
		None => {
			let model: ContextModel<char> = match &args.model {
				Some(path) => store::load(path)?,
				None => train_letter_model(&corpus, args.ngram_size.unwrap_or(settings.ngram_size))?,
			};
			if let Some(path) = &args.save_model {
				store::save(&model, path)?;
			}
			let options = GenerateOptions {
				count,
				min_len: args.min_len.unwrap_or(settings.min_len),
				max_len: args.max_len.unwrap_or(settings.max_len),
				..GenerateOptions::from_settings(&settings)
			};
			generate_words(&model, &options, &validator, &mut *rng)
		}
	};

	report(&generation);
	Ok(())
}

fn report(generation: &Generation) {
	for word in &generation.words {
		println!("{word}");
	}
	if !generation.is_complete() {
		println!(
			"\nWARNING: Could only generate {}/{} valid words.",
			generation.words.len(),
			generation.requested
		);
		println!("Try relaxing your constraints or using a larger corpus.");
	}
}

pub fn validate(global: &GlobalArgs, args: ValidateArgs) -> Result<()> {
	let paths = data_paths(global);
	let sentiment = load_sentiment(global, &paths);
	let validator = WordValidator::new()
		.with_dictionary(word_list(args.dictionary, paths.dictionary()))
		.with_blocklist(word_list(args.blocklist, paths.blocklist()));

	println!("Validating word: '{}'", args.word);
	match validator.check(&args.word) {
		Ok(()) => println!("  - Validation Result: Valid"),
		Err(rejection) => println!("  - Validation Result: Invalid ({rejection})"),
	}
	println!("  - Sentiment Score:   {:.3} (0=neg, 0.5=neu, 1=pos)", sentiment.score(&args.word));

	if let Some(path) = &args.corpus {
		let model = PronounceabilityModel::train(load_corpus(path)?);
		println!("  - Pronounceability:  {:.3}", model.score(&args.word));
	}
	Ok(())
}

pub fn rhyme(global: &GlobalArgs, args: RhymeArgs) -> Result<()> {
	let paths = data_paths(global);
	let lexicon = load_lexicon(global, &paths)?;

	match RhymeTarget::resolve(&lexicon, &args.word) {
		Ok(target) => {
			println!("Word: '{}'", target.word);
			println!("  - Phonemes:        {}", format_pronunciation(&target.pronunciation));
			println!("  - Rhyme Signature: {}", target.signature);
		}
		Err(e @ (SlithyError::LexiconMiss(_) | SlithyError::NoRhymeSignature(_))) => println!("{e}"),
		Err(e) => return Err(e.into()),
	}
	Ok(())
}

pub fn build_phonetic(global: &GlobalArgs, args: BuildPhoneticArgs) -> Result<()> {
	let paths = data_paths(global);
	let settings = Settings::load(paths.settings());
	let lexicon = load_lexicon(global, &paths)?;
	let corpus = load_corpus(&args.corpus)?;

	let model = train_phonetic_model(&corpus, &lexicon, args.ngram_size.unwrap_or(settings.phonetic_order))?;
	store::save(&model, args.output.unwrap_or_else(|| paths.phonetic_model()))?;
	Ok(())
}

pub fn build_transcription(global: &GlobalArgs, args: BuildTranscriptionArgs) -> Result<()> {
	let paths = data_paths(global);
	let lexicon = load_lexicon(global, &paths)?;
	let corpus = load_corpus(&args.corpus)?;

	let table = train_transcription_table(&corpus, &lexicon);
	store::save(&table, args.output.unwrap_or_else(|| paths.transcription_model()))?;
	Ok(())
}

pub fn purify(global: &GlobalArgs, args: PurifyArgs) -> Result<()> {
	let paths = data_paths(global);
	let lexicon = load_lexicon(global, &paths)?;
	let corpus = load_corpus(&args.input)?;

	let purified = purify_corpus(&corpus, &lexicon);
	write_lines(&args.output, &purified).with_context(|| format!("failed to write {}", args.output.display()))?;
	log::info!("kept {} of {} words in {}", purified.len(), corpus.len(), args.output.display());
	Ok(())
}

pub fn export_lexicon(global: &GlobalArgs, args: ExportLexiconArgs) -> Result<()> {
	let paths = data_paths(global);
	let lexicon = load_lexicon(global, &paths)?;

	let words = lexicon.words();
	write_lines(&args.output, &words).with_context(|| format!("failed to write {}", args.output.display()))?;
	log::info!("exported {} words to {}", words.len(), args.output.display());
	Ok(())
}

pub fn init_config(global: &GlobalArgs, args: InitConfigArgs) -> Result<()> {
	let path = data_paths(global).settings();
	if path.exists() && !args.force {
		anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
	}
	Settings::default().save(&path)?;
	println!("Wrote default settings to {}", path.display());
	Ok(())
}
