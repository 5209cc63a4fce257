use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;

mod commands;

#[derive(Parser, Debug)]
#[command(author, version, about = "Invent new words from a corpus", long_about = None)]
struct Cli {
	#[command(flatten)]
	global: GlobalArgs,

	#[command(subcommand)]
	command: Commands,
}

/// Resource locations shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
	/// Data directory (defaults to $SLITHY_DATA_DIR, then ~/.slithyt/data)
	#[arg(long, value_name = "DIR", global = true)]
	pub data_dir: Option<PathBuf>,

	/// CMU pronouncing dictionary (defaults to <data-dir>/cmudict.dict)
	#[arg(long, value_name = "PATH", global = true)]
	pub cmudict: Option<PathBuf>,

	/// VADER sentiment lexicon (defaults to <data-dir>/vader_lexicon.txt)
	#[arg(long, value_name = "PATH", global = true)]
	pub sentiment_lexicon: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Generate new words
	Generate(GenerateArgs),
	/// Check a single word against the filters
	Validate(ValidateArgs),
	/// Show the pronunciation and rhyme signature of a word
	Rhyme(RhymeArgs),
	/// Train and store the phonetic model used for rhymes
	BuildPhonetic(BuildPhoneticArgs),
	/// Train and store the phoneme-to-letter table used for rhymes
	BuildTranscription(BuildTranscriptionArgs),
	/// Keep only alphabetic corpus words with a known pronunciation
	Purify(PurifyArgs),
	/// Write every word of the pronouncing dictionary
	ExportLexicon(ExportLexiconArgs),
	/// Write the default settings file into the data directory
	InitConfig(InitConfigArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
	/// Training corpus, one word per line (plain or gzip)
	#[arg(short, long, value_name = "PATH")]
	pub corpus: PathBuf,

	/// Number of words to generate
	#[arg(short = 'n', long, value_name = "N")]
	pub count: Option<usize>,

	/// Shortest accepted word
	#[arg(long, value_name = "LEN")]
	pub min_len: Option<usize>,

	/// Longest accepted word
	#[arg(long, value_name = "LEN")]
	pub max_len: Option<usize>,

	/// Keep only words matching this pattern (case-insensitive)
	#[arg(long, value_name = "REGEX")]
	pub matches_regex: Option<String>,

	/// Drop words matching this pattern (case-insensitive)
	#[arg(long, value_name = "REGEX")]
	pub reject_regex: Option<String>,

	/// Known words to exclude (defaults to <data-dir>/en-dict.dat)
	#[arg(long, value_name = "PATH")]
	pub dictionary: Option<PathBuf>,

	/// Words never to produce (defaults to <data-dir>/en-block.dat)
	#[arg(long, value_name = "PATH")]
	pub blocklist: Option<PathBuf>,

	/// Order of the letter model
	#[arg(long, value_name = "N")]
	pub ngram_size: Option<usize>,

	/// Lowest accepted sentiment score, in [0, 1]
	#[arg(long, value_name = "SCORE")]
	pub min_sentiment: Option<f64>,

	/// Highest accepted sentiment score, in [0, 1]
	#[arg(long, value_name = "SCORE")]
	pub max_sentiment: Option<f64>,

	/// Lowest accepted pronounceability score, in [0, 1]
	#[arg(long, value_name = "SCORE")]
	pub min_pronounceability: Option<f64>,

	/// Generate words rhyming with this word instead
	#[arg(long, value_name = "WORD")]
	pub rhyme: Option<String>,

	/// Allow words that already appear in the corpus
	#[arg(long)]
	pub allow_corpus_words: bool,

	/// Seed the random generator for reproducible output
	#[arg(long, value_name = "SEED")]
	pub seed: Option<u64>,

	/// Load the letter model from this file instead of training it
	#[arg(long, value_name = "PATH")]
	pub model: Option<PathBuf>,

	/// Store the letter model in this file
	#[arg(long, value_name = "PATH")]
	pub save_model: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
	/// Word to check
	pub word: String,

	#[arg(long, value_name = "PATH")]
	pub dictionary: Option<PathBuf>,

	#[arg(long, value_name = "PATH")]
	pub blocklist: Option<PathBuf>,

	/// Corpus to score pronounceability against
	#[arg(short, long, value_name = "PATH")]
	pub corpus: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RhymeArgs {
	pub word: String,
}

#[derive(Args, Debug)]
pub struct BuildPhoneticArgs {
	#[arg(short, long, value_name = "PATH")]
	pub corpus: PathBuf,

	/// Order of the phonetic model
	#[arg(long, value_name = "N")]
	pub ngram_size: Option<usize>,

	/// Output file (defaults to <data-dir>/phonetic-model.bin)
	#[arg(short, long, value_name = "PATH")]
	pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct BuildTranscriptionArgs {
	#[arg(short, long, value_name = "PATH")]
	pub corpus: PathBuf,

	/// Output file (defaults to <data-dir>/transcription-model.bin)
	#[arg(short, long, value_name = "PATH")]
	pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PurifyArgs {
	pub input: PathBuf,
	pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct ExportLexiconArgs {
	pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct InitConfigArgs {
	/// Overwrite an existing settings file
	#[arg(long)]
	pub force: bool,
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	let cli = Cli::parse();
	let global = &cli.global;
	match cli.command {
		Commands::Generate(args) => commands::generate(global, args),
		Commands::Validate(args) => commands::validate(global, args),
		Commands::Rhyme(args) => commands::rhyme(global, args),
		Commands::BuildPhonetic(args) => commands::build_phonetic(global, args),
		Commands::BuildTranscription(args) => commands::build_transcription(global, args),
		Commands::Purify(args) => commands::purify(global, args),
		Commands::ExportLexicon(args) => commands::export_lexicon(global, args),
		Commands::InitConfig(args) => commands::init_config(global, args),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn generate_args(args: &[&str]) -> GenerateArgs {
		let argv = ["slithy", "generate", "--corpus", "words.txt"].iter().chain(args);
		match Cli::try_parse_from(argv).unwrap().command {
			Commands::Generate(args) => args,
			other => panic!("parsed {other:?}"),
		}
	}

	#[test]
	fn rhyme_mode_ignores_letter_model_flags() {
		let args = generate_args(&["--rhyme", "cat", "--min-len", "3", "--model", "m.bin", "--ngram-size", "4"]);
		assert_eq!(commands::ignored_flags(&args), vec!["--min-len", "--ngram-size", "--model"]);
	}

	#[test]
	fn loaded_model_ignores_ngram_size() {
		let args = generate_args(&["--model", "m.bin", "--ngram-size", "4", "--max-len", "8"]);
		assert_eq!(commands::ignored_flags(&args), vec!["--ngram-size"]);
	}

	#[test]
	fn plain_generation_ignores_nothing() {
		let args = generate_args(&["--ngram-size", "4", "--min-len", "3", "--save-model", "m.bin"]);
		assert!(commands::ignored_flags(&args).is_empty());
	}

	#[test]
	fn global_flags_after_the_subcommand() {
		let cli = Cli::try_parse_from(["slithy", "rhyme", "cat", "--data-dir", "/tmp/slithy"]).unwrap();
		assert_eq!(cli.global.data_dir, Some(PathBuf::from("/tmp/slithy")));
	}
}
