//! Subdomain-list staging: stdin capture and pass-by-reference.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::config::CAPTURE_CHUNK_SIZE;
use crate::error_handling::StagingError;
use crate::workspace::new_staging_file;

/// Copies `reader` byte-for-byte into a new staging file until end of stream.
///
/// Partial content is not rolled back on error; the truncated file is
/// removed when the workspace is released.
///
/// # Errors
///
/// Returns `StagingError::CaptureIOError` if reading or writing fails mid-copy,
/// or `StagingFileCreateError` if the staging file cannot be created.
/// Returns `InterruptedError` once `cancel` fires; it is checked between
/// chunks, so a read that is blocked waiting for data is not interrupted.
pub fn stage_capture<R: Read + ?Sized>(
    reader: &mut R,
    workspace: &Path,
    cancel: &CancellationToken,
) -> Result<PathBuf, StagingError> {
    if cancel.is_cancelled() {
        return Err(StagingError::InterruptedError);
    }
    let (staged, file) = new_staging_file(workspace)?;
    let mut writer = BufWriter::new(file);
    let capture_error = |source: io::Error| StagingError::CaptureIOError { source };

    let mut buf = vec![0u8; CAPTURE_CHUNK_SIZE];
    let mut copied = 0u64;
    loop {
        if cancel.is_cancelled() {
            return Err(StagingError::InterruptedError);
        }
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(capture_error(e)),
        };
        writer.write_all(&buf[..n]).map_err(capture_error)?;
        copied += n as u64;
    }
    writer.flush().map_err(capture_error)?;

    debug!("Captured {} bytes of input into {}", copied, staged.display());
    Ok(staged)
}

/// Returns a user-supplied subdomain list as the staged path, verbatim.
///
/// The file is only opened to check it is readable. It is never copied,
/// modified or deleted.
///
/// # Errors
///
/// Returns `StagingError::InvalidConfigurationError` if the path cannot be
/// opened for reading or is not a regular file.
pub fn stage_reference(path: &Path) -> Result<PathBuf, StagingError> {
    let unreadable = |reason: String| {
        StagingError::InvalidConfigurationError(format!(
            "subdomain list {} is not readable: {}",
            path.display(),
            reason
        ))
    };

    let file = File::open(path).map_err(|e| unreadable(e.to_string()))?;
    let metadata = file.metadata().map_err(|e| unreadable(e.to_string()))?;
    if !metadata.is_file() {
        return Err(unreadable("not a regular file".to_string()));
    }

    debug!("Resolving existing subdomain list {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// Yields some bytes, then fails like a broken pipe.
    struct FailingReader {
        sent: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "upstream closed"));
            }
            self.sent = true;
            let chunk = b"a.example.com\n";
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    /// Never ends; cancels `token` after handing out `before_cancel` chunks.
    struct EndlessReader {
        token: CancellationToken,
        before_cancel: usize,
        reads: usize,
    }

    impl Read for EndlessReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads += 1;
            if self.reads == self.before_cancel {
                self.token.cancel();
            }
            let chunk = b"x.example.com\n";
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    fn no_cancel() -> CancellationToken {
        CancellationToken::new()
    }

    #[test]
    fn test_capture_is_byte_exact() {
        let workspace = TempDir::new().expect("Failed to create temp directory");
        let input = b"a.example.com\r\n\x00\x1b[0m\n\nb.example.com".to_vec();

        let staged = stage_capture(
            &mut Cursor::new(input.clone()),
            workspace.path(),
            &no_cancel(),
        )
        .unwrap();

        assert_eq!(staged.parent(), Some(workspace.path()));
        assert_eq!(std::fs::read(staged).unwrap(), input);
    }

    #[test]
    fn test_capture_empty_stream() {
        let workspace = TempDir::new().expect("Failed to create temp directory");
        let staged = stage_capture(&mut io::empty(), workspace.path(), &no_cancel()).unwrap();
        assert_eq!(std::fs::read(staged).unwrap().len(), 0);
    }

    #[test]
    fn test_capture_error_leaves_partial_file() {
        let workspace = TempDir::new().expect("Failed to create temp directory");
        let mut reader = FailingReader { sent: false };

        let err = stage_capture(&mut reader, workspace.path(), &no_cancel()).unwrap_err();
        assert!(matches!(err, StagingError::CaptureIOError { .. }));

        // Truncated output stays behind until the workspace is released
        assert_eq!(std::fs::read_dir(workspace.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_capture_stops_when_cancelled() {
        let workspace = TempDir::new().expect("Failed to create temp directory");
        let token = CancellationToken::new();
        let mut reader = EndlessReader {
            token: token.clone(),
            before_cancel: 3,
            reads: 0,
        };

        let err = stage_capture(&mut reader, workspace.path(), &token).unwrap_err();

        assert!(matches!(err, StagingError::InterruptedError));
        assert_eq!(reader.reads, 3);
        assert_eq!(std::fs::read_dir(workspace.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_capture_cancelled_before_start_creates_nothing() {
        let workspace = TempDir::new().expect("Failed to create temp directory");
        let token = CancellationToken::new();
        token.cancel();

        let err = stage_capture(&mut io::empty(), workspace.path(), &token).unwrap_err();

        assert!(matches!(err, StagingError::InterruptedError));
        assert_eq!(std::fs::read_dir(workspace.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_reference_returns_path_verbatim() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let list = temp_dir.path().join("known.txt");
        std::fs::write(&list, "a.example.com\n").unwrap();

        let staged = stage_reference(&list).unwrap();

        assert_eq!(staged, list);
        assert_eq!(std::fs::read_to_string(&list).unwrap(), "a.example.com\n");
    }

    #[test]
    fn test_reference_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("missing.txt");

        let err = stage_reference(&missing).unwrap_err();
        match err {
            StagingError::InvalidConfigurationError(msg) => {
                assert!(msg.contains("missing.txt"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reference_rejects_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let err = stage_reference(temp_dir.path()).unwrap_err();
        assert!(matches!(err, StagingError::InvalidConfigurationError(_)));
    }
}
