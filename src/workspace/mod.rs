//! Per-run workspace management.
//!
//! A `Workspace` is an ephemeral directory that exclusively owns every
//! staging file of one enumeration run. It is removed exactly once: either
//! through [`Workspace::release`] or, failing that, when it is dropped.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use uuid::Uuid;

use crate::config::WORKSPACE_PREFIX;
use crate::error_handling::StagingError;

/// Ephemeral directory owned by a single run.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    released: bool,
}

impl Workspace {
    /// Creates a uniquely named workspace directory under `parent`.
    ///
    /// The returned path is absolute.
    ///
    /// # Errors
    ///
    /// Returns `StagingError::WorkspaceCreateError` if `parent` is missing,
    /// not writable, or the filesystem refuses the directory.
    pub fn acquire(parent: &Path) -> Result<Self, StagingError> {
        let create_error = |source: io::Error| StagingError::WorkspaceCreateError {
            parent: parent.to_path_buf(),
            source,
        };

        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)
            .map_err(create_error)?;
        // From here on removal is ours, not tempfile's
        let path = dir.keep();
        let path = match std::path::absolute(&path) {
            Ok(absolute) => absolute,
            Err(e) => {
                let _ = release_dir(&path);
                return Err(create_error(e));
            }
        };

        debug!("Created workspace {}", path.display());
        Ok(Self {
            path,
            released: false,
        })
    }

    /// Absolute path of the workspace directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the workspace and everything in it.
    ///
    /// Only the first call touches the filesystem; later calls are no-ops.
    pub fn release(&mut self) -> io::Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        release_dir(&self.path)?;
        debug!("Released workspace {}", self.path.display());
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(
                "Failed to remove workspace {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Creates a new staging file named with a random UUID inside `workspace`.
///
/// The file is created with `create_new`, so an existing file is never reused.
///
/// # Errors
///
/// Returns `StagingError::StagingFileCreateError` if the file cannot be created.
pub fn new_staging_file(workspace: &Path) -> Result<(PathBuf, File), StagingError> {
    let path = workspace.join(Uuid::new_v4().simple().to_string());
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|source| StagingError::StagingFileCreateError {
            workspace: workspace.to_path_buf(),
            source,
        })?;
    Ok((path, file))
}

/// Recursively removes `path`.
///
/// A path that does not exist (never created, or already removed) is not an error.
pub fn release_dir(path: &Path) -> io::Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
