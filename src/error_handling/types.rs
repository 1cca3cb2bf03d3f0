//! Error type definitions.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors raised while preparing resolver input.
///
/// Every variant is fatal for the run. The workspace is still released
/// on the way out.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum StagingError {
    /// No massdns binary at the override or any well-known location.
    #[error("could not find massdns binary (searched: {})", display_paths(.searched))]
    ResolverNotFoundError {
        /// Locations that were probed
        searched: Vec<PathBuf>,
    },

    /// The per-run workspace directory could not be created.
    #[error("could not create workspace under {}: {source}", .parent.display())]
    WorkspaceCreateError {
        /// Requested parent directory
        parent: PathBuf,
        /// Underlying filesystem error
        source: io::Error,
    },

    /// A staging file could not be created inside the workspace.
    #[error("could not create staging file in {}: {source}", .workspace.display())]
    StagingFileCreateError {
        /// Workspace directory
        workspace: PathBuf,
        /// Underlying filesystem error
        source: io::Error,
    },

    /// Writing to a staging file failed.
    #[error("could not write staging file {}: {source}", .path.display())]
    StagingFileWriteError {
        /// Staging file being written
        path: PathBuf,
        /// Underlying filesystem error
        source: io::Error,
    },

    /// The bruteforce wordlist could not be opened or read.
    #[error("could not read bruteforce wordlist {}: {source}", .path.display())]
    WordlistReadError {
        /// Wordlist path
        path: PathBuf,
        /// Underlying read error
        source: io::Error,
    },

    /// Copying standard input into the workspace failed.
    #[error("could not capture standard input: {source}")]
    CaptureIOError {
        /// Underlying I/O error
        source: io::Error,
    },

    /// No enumeration mode applies, or a mode is missing a required value.
    #[error("invalid configuration: {0}")]
    InvalidConfigurationError(String),

    /// The run was interrupted (Ctrl-C) before it completed.
    #[error("enumeration interrupted")]
    InterruptedError,

    /// A blocking staging task panicked or was cancelled.
    #[error("staging task failed: {0}")]
    TaskJoinError(#[from] tokio::task::JoinError),
}

/// Errors raised while handing staged files to massdns.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum HandoffError {
    /// massdns could not be started.
    #[error("could not start {}: {source}", .binary.display())]
    ResolverSpawnError {
        /// massdns binary
        binary: PathBuf,
        /// Underlying spawn error
        source: io::Error,
    },

    /// massdns exited unsuccessfully for one input.
    #[error("massdns failed on {} ({status})", .input.display())]
    ResolverExitError {
        /// Staged input being resolved
        input: PathBuf,
        /// Exit status reported by massdns
        status: ExitStatus,
    },

    /// The output file could not be opened or shared with massdns.
    #[error("could not open output file {}: {source}", .path.display())]
    OutputOpenError {
        /// Output path
        path: PathBuf,
        /// Underlying filesystem error
        source: io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "none".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
