// Shared test helpers for staging runs.
//
// This module provides a recording handoff and filesystem helpers used across
// the integration test files.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use massdns_runner::handoff::ResolverHandoff;
use massdns_runner::HandoffError;

/// What the handoff observed for one staged input, at the moment it was called.
#[derive(Debug, Clone)]
pub struct Observed {
    pub path: PathBuf,
    pub content: Vec<u8>,
    /// Number of files inside the run's workspace when the handoff ran
    pub workspace_files: usize,
}

/// Handoff that reads every staged file instead of running massdns.
pub struct RecordingHandoff {
    parent: PathBuf,
    fail: bool,
    pub observed: Mutex<Vec<Observed>>,
}

impl RecordingHandoff {
    /// Records inputs for runs whose workspace lives under `parent`.
    pub fn new(parent: &Path) -> Self {
        Self {
            parent: parent.to_path_buf(),
            fail: false,
            observed: Mutex::new(Vec::new()),
        }
    }

    /// Records inputs and then fails every call, like a crashing resolver.
    #[allow(dead_code)] // Used by other test files
    pub fn failing(parent: &Path) -> Self {
        Self {
            fail: true,
            ..Self::new(parent)
        }
    }

    pub fn observed(&self) -> Vec<Observed> {
        self.observed.lock().unwrap().clone()
    }
}

impl ResolverHandoff for RecordingHandoff {
    async fn resolve(&self, input: &Path) -> Result<(), HandoffError> {
        let content = std::fs::read(input).expect("Staged input should be readable");
        let workspace_files = workspace_under(&self.parent)
            .map(|ws| std::fs::read_dir(ws).unwrap().count())
            .unwrap_or(0);
        self.observed.lock().unwrap().push(Observed {
            path: input.to_path_buf(),
            content,
            workspace_files,
        });

        if self.fail {
            return Err(HandoffError::ResolverSpawnError {
                binary: PathBuf::from("massdns"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "simulated failure"),
            });
        }
        Ok(())
    }
}

/// The single workspace directory currently under `parent`, if any.
pub fn workspace_under(parent: &Path) -> Option<PathBuf> {
    std::fs::read_dir(parent)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .find(|path| path.is_dir())
}

/// Number of entries directly under `dir`.
pub fn entry_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
