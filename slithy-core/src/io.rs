use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;

/// First two bytes of every gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Returns `true` if the file starts with the gzip magic number.
pub(crate) fn is_gzip<P: AsRef<Path>>(filename: P) -> io::Result<bool> {
	let mut magic = [0u8; 2];
	let mut file = File::open(filename)?;
	match file.read_exact(&mut magic) {
		Ok(()) => Ok(magic == GZIP_MAGIC),
		Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
		Err(e) => Err(e),
	}
}

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Transparently decompresses gzip content (detected by magic number,
///   not by extension)
/// - Splits on `\n` / `\r\n`
///
/// # Errors
/// Returns an error if the file cannot be opened, is not valid gzip while
/// carrying the gzip magic, or is not UTF-8.
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let filename = filename.as_ref();
	let mut contents = String::new();
	if is_gzip(filename)? {
		GzDecoder::new(File::open(filename)?).read_to_string(&mut contents)?;
	} else {
		File::open(filename)?.read_to_string(&mut contents)?;
	}
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Reads a corpus of words, one per line.
///
/// Lines are trimmed and lowercased; empty lines are skipped. Order and
/// duplicates are preserved, since duplicates carry frequency.
pub fn read_corpus<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	Ok(read_lines(filename)?
		.into_iter()
		.map(|line| line.trim().to_lowercase())
		.filter(|word| !word.is_empty())
		.collect())
}

/// Writes one entry per line, creating parent directories as needed.
pub fn write_lines<P, I, S>(filename: P, lines: I) -> io::Result<()>
where
	P: AsRef<Path>,
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let filename = filename.as_ref();
	if let Some(parent) = filename.parent().filter(|p| !p.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent)?;
	}
	let mut writer = BufWriter::new(File::create(filename)?);
	for line in lines {
		writeln!(writer, "{}", line.as_ref())?;
	}
	writer.flush()
}
