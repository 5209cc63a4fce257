//! Data directory layout and user settings.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SlithyError;

/// Overrides the default data directory when set and non-empty.
pub const DATA_DIR_ENV: &str = "SLITHY_DATA_DIR";

/// Locations of every persisted artifact and resource file.
///
/// Everything lives in one directory, by default `~/.slithyt/data`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataPaths {
	root: PathBuf,
}

impl DataPaths {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// Resolves the data directory.
	///
	/// Order: `explicit`, then `$SLITHY_DATA_DIR`, then `$HOME/.slithyt/data`.
	/// Falls back to `./.slithyt/data` if `HOME` is unset or not absolute.
	pub fn resolve(explicit: Option<&Path>) -> Self {
		Self::resolve_from(explicit, env::var_os(DATA_DIR_ENV), env::var_os("HOME"))
	}

	fn resolve_from(explicit: Option<&Path>, data_dir: Option<OsString>, home: Option<OsString>) -> Self {
		if let Some(path) = explicit {
			return Self::new(path);
		}
		if let Some(dir) = data_dir.filter(|dir| !dir.is_empty()) {
			return Self::new(dir);
		}
		let base = home
			.map(PathBuf::from)
			.filter(|home| home.is_absolute())
			.unwrap_or_else(|| PathBuf::from("."));
		Self::new(base.join(".slithyt").join("data"))
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Pre-trained phonetic context model.
	pub fn phonetic_model(&self) -> PathBuf {
		self.root.join("phonetic-model.bin")
	}

	/// Pre-trained phoneme-to-letter table.
	pub fn transcription_model(&self) -> PathBuf {
		self.root.join("transcription-model.bin")
	}

	/// CMU pronouncing dictionary.
	pub fn cmudict(&self) -> PathBuf {
		self.root.join("cmudict.dict")
	}

	/// VADER-format sentiment lexicon.
	pub fn sentiment_lexicon(&self) -> PathBuf {
		self.root.join("vader_lexicon.txt")
	}

	/// Known words, rejected to keep output novel.
	pub fn dictionary(&self) -> PathBuf {
		self.root.join("en-dict.dat")
	}

	pub fn blocklist(&self) -> PathBuf {
		self.root.join("en-block.dat")
	}

	pub fn settings(&self) -> PathBuf {
		self.root.join("config.json")
	}
}

/// Default generation parameters, overridable from the command line.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
	/// Number of words to generate
	#[serde(default = "default_count")]
	pub count: usize,
	/// Shortest accepted word, in letters
	#[serde(default = "default_min_len")]
	pub min_len: usize,
	/// Longest accepted word, in letters
	#[serde(default = "default_max_len")]
	pub max_len: usize,
	/// Order of the letter model
	#[serde(default = "default_ngram_size")]
	pub ngram_size: usize,
	/// Order of the phonetic model built by `build-phonetic`
	#[serde(default = "default_phonetic_order")]
	pub phonetic_order: usize,
	/// Draws before the rhyme signature is appended
	#[serde(default = "default_phonetic_steps")]
	pub phonetic_steps: usize,
	/// Attempt budget per requested word, free generation
	#[serde(default = "default_attempts_per_word")]
	pub attempts_per_word: usize,
	/// Attempt budget per requested word, rhyme generation
	#[serde(default = "default_rhyme_attempts_per_word")]
	pub rhyme_attempts_per_word: usize,
}

fn default_count() -> usize {
	10
}

fn default_min_len() -> usize {
	5
}

fn default_max_len() -> usize {
	10
}

fn default_ngram_size() -> usize {
	3
}

fn default_phonetic_order() -> usize {
	3
}

fn default_phonetic_steps() -> usize {
	10
}

fn default_attempts_per_word() -> usize {
	100
}

fn default_rhyme_attempts_per_word() -> usize {
	200
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			count: default_count(),
			min_len: default_min_len(),
			max_len: default_max_len(),
			ngram_size: default_ngram_size(),
			phonetic_order: default_phonetic_order(),
			phonetic_steps: default_phonetic_steps(),
			attempts_per_word: default_attempts_per_word(),
			rhyme_attempts_per_word: default_rhyme_attempts_per_word(),
		}
	}
}

impl Settings {
	/// Loads settings from a JSON file.
	///
	/// A missing file yields the defaults; an unparsable one logs a warning
	/// and yields the defaults too.
	pub fn load<P: AsRef<Path>>(path: P) -> Self {
		let path = path.as_ref();
		match fs::read_to_string(path) {
			Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
				log::warn!("ignoring invalid settings file {}: {}", path.display(), e);
				Self::default()
			}),
			Err(_) => Self::default(),
		}
	}

	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SlithyError> {
		let path = path.as_ref();
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent)?;
		}
		fs::write(path, serde_json::to_string_pretty(self)?)?;
		Ok(())
	}
}
