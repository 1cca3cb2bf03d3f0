//! massdns binary discovery.
//!
//! Discovery runs once at startup. The pipeline only ever sees the path it
//! returns.

use std::path::{Path, PathBuf};

use log::debug;

use crate::config::DEFAULT_MASSDNS_LOCATIONS;
use crate::error_handling::StagingError;

/// Returns the built-in massdns locations as paths, in probe order.
pub fn default_locations() -> Vec<PathBuf> {
    DEFAULT_MASSDNS_LOCATIONS.iter().map(PathBuf::from).collect()
}

/// Resolves the massdns binary path.
///
/// An override wins when it names an executable file; it is never silently
/// replaced by a candidate. Without an override, the first candidate that
/// exists as a file is returned.
///
/// # Errors
///
/// Returns `StagingError::ResolverNotFoundError` listing every probed path
/// when nothing usable is found.
pub fn discover_resolver(
    candidates: &[PathBuf],
    override_path: Option<&Path>,
) -> Result<PathBuf, StagingError> {
    if let Some(path) = override_path {
        if !path.as_os_str().is_empty() && is_executable_file(path) {
            debug!("Using configured massdns binary {}", path.display());
            return Ok(path.to_path_buf());
        }
        return Err(StagingError::ResolverNotFoundError {
            searched: vec![path.to_path_buf()],
        });
    }

    for candidate in candidates {
        if is_executable_file(candidate) {
            debug!("Found massdns binary at {}", candidate.display());
            return Ok(candidate.clone());
        }
    }

    Err(StagingError::ResolverNotFoundError {
        searched: candidates.to_vec(),
    })
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}
