use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::error::SlithyError;

/// Serializes `value` with `postcard` and writes it to `path` atomically.
///
/// The bytes go to a temporary file in the target directory, which is then
/// renamed over `path`: readers never observe a half-written model.
/// Parent directories are created as needed.
pub fn save<T, P>(value: &T, path: P) -> Result<(), SlithyError>
where
	T: Serialize,
	P: AsRef<Path>,
{
	let path = path.as_ref();
	let parent = path
		.parent()
		.filter(|p| !p.as_os_str().is_empty())
		.unwrap_or_else(|| Path::new("."));
	fs::create_dir_all(parent)?;

	let bytes = postcard::to_stdvec(value)?;
	let mut temp_file = NamedTempFile::new_in(parent)?;
	temp_file.write_all(&bytes)?;
	temp_file.persist(path).map_err(|e| e.error)?;

	log::info!("saved {} bytes to {}", bytes.len(), path.display());
	Ok(())
}

/// Reads back a value written by [`save`].
///
/// # Errors
/// Returns [`SlithyError::ModelUnavailable`] if the file is missing,
/// unreadable or does not decode as `T`.
pub fn load<T, P>(path: P) -> Result<T, SlithyError>
where
	T: DeserializeOwned,
	P: AsRef<Path>,
{
	let path = path.as_ref();
	let unavailable = |reason: String| SlithyError::ModelUnavailable {
		path: path.to_path_buf(),
		reason,
	};

	let bytes = fs::read(path).map_err(|e| unavailable(e.to_string()))?;
	postcard::from_bytes(&bytes).map_err(|e| unavailable(e.to_string()))
}
