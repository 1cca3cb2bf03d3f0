//! Brute-force candidate generation.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::error_handling::StagingError;
use crate::workspace::new_staging_file;

/// Writes `<entry>.<domain>` for every non-empty wordlist line into a new
/// staging file and returns its path.
///
/// The wordlist is streamed, so its size is not bounded by memory. Entries
/// are neither trimmed, normalized nor deduplicated; only the line
/// terminator (`\n` or `\r\n`) is removed.
///
/// # Errors
///
/// - `WordlistReadError` if the wordlist cannot be opened or a read fails
/// - `StagingFileCreateError` / `StagingFileWriteError` for the output side
/// - `InterruptedError` once `cancel` fires, checked before every line
///
/// On error the partial staging file is closed and left for workspace release.
pub fn stage_bruteforce(
    wordlist: &Path,
    domain: &str,
    workspace: &Path,
    cancel: &CancellationToken,
) -> Result<PathBuf, StagingError> {
    let read_error = |source: std::io::Error| StagingError::WordlistReadError {
        path: wordlist.to_path_buf(),
        source,
    };

    let input = File::open(wordlist).map_err(read_error)?;
    if cancel.is_cancelled() {
        return Err(StagingError::InterruptedError);
    }
    let (staged, file) = new_staging_file(workspace)?;
    let write_error = |source: std::io::Error| StagingError::StagingFileWriteError {
        path: staged.clone(),
        source,
    };

    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(file);
    let mut line = Vec::new();
    let mut generated = 0usize;

    loop {
        if cancel.is_cancelled() {
            return Err(StagingError::InterruptedError);
        }
        line.clear();
        if reader.read_until(b'\n', &mut line).map_err(read_error)? == 0 {
            break;
        }
        let entry = strip_line_ending(&line);
        if entry.is_empty() {
            continue;
        }
        write_candidate(&mut writer, entry, domain.as_bytes()).map_err(write_error)?;
        generated += 1;
    }

    writer.flush().map_err(write_error)?;
    debug!(
        "Generated {} bruteforce candidates for {} into {}",
        generated,
        domain,
        staged.display()
    );
    Ok(staged)
}

fn write_candidate<W: Write>(writer: &mut W, entry: &[u8], domain: &[u8]) -> std::io::Result<()> {
    writer.write_all(entry)?;
    writer.write_all(b".")?;
    writer.write_all(domain)?;
    writer.write_all(b"\n")
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
