//! Handoff of staged files to the external resolver.
//!
//! The pipeline only guarantees that every path it hands over is fully
//! written and closed. How the resolver is run is up to the
//! [`ResolverHandoff`] implementation.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use log::{debug, info};
use tokio::process::Command;

use crate::config::{Config, MASSDNS_OUTPUT_FORMAT, MASSDNS_RECORD_TYPE};
use crate::error_handling::{HandoffError, StagingError};

/// Receives staged input files, one call per file, in staging order.
pub trait ResolverHandoff {
    /// Resolves the hostnames listed in `input`.
    fn resolve(&self, input: &Path) -> impl Future<Output = Result<(), HandoffError>> + Send;
}

/// Runs massdns once per staged file.
///
/// Output from every invocation goes to the same destination: the configured
/// output file (truncated once, then appended in order) or inherited stdout.
#[derive(Debug)]
pub struct MassdnsHandoff {
    binary: PathBuf,
    resolvers: PathBuf,
    threads: usize,
    output: Option<(PathBuf, File)>,
}

impl MassdnsHandoff {
    /// Prepares a handoff to the massdns `binary` using the run configuration.
    ///
    /// # Errors
    ///
    /// - `StagingError::InvalidConfigurationError` if no readable resolver list is configured
    /// - `HandoffError::OutputOpenError` if the output file cannot be created
    pub fn new(binary: PathBuf, config: &Config) -> anyhow::Result<Self> {
        let resolvers = match &config.resolvers {
            Some(path) if path.is_file() => path.clone(),
            Some(path) => {
                return Err(StagingError::InvalidConfigurationError(format!(
                    "resolver list {} does not exist",
                    path.display()
                ))
                .into())
            }
            None => {
                return Err(StagingError::InvalidConfigurationError(
                    "a resolver list is required to run massdns".to_string(),
                )
                .into())
            }
        };

        let output = match &config.output {
            Some(path) => {
                let file = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)
                    .map_err(|source| HandoffError::OutputOpenError {
                        path: path.clone(),
                        source,
                    })?;
                Some((path.clone(), file))
            }
            None => None,
        };

        Ok(Self {
            binary,
            resolvers,
            threads: config.threads,
            output,
        })
    }

    /// Arguments passed to massdns for one staged input.
    pub fn args(&self, input: &Path) -> Vec<OsString> {
        vec![
            "-r".into(),
            self.resolvers.clone().into_os_string(),
            "-t".into(),
            MASSDNS_RECORD_TYPE.into(),
            "-o".into(),
            MASSDNS_OUTPUT_FORMAT.into(),
            "-s".into(),
            self.threads.to_string().into(),
            input.as_os_str().to_os_string(),
        ]
    }

    fn stdout(&self) -> Result<Stdio, HandoffError> {
        match &self.output {
            Some((path, file)) => {
                let shared = file
                    .try_clone()
                    .map_err(|source| HandoffError::OutputOpenError {
                        path: path.clone(),
                        source,
                    })?;
                Ok(Stdio::from(shared))
            }
            None => Ok(Stdio::inherit()),
        }
    }
}

impl ResolverHandoff for MassdnsHandoff {
    async fn resolve(&self, input: &Path) -> Result<(), HandoffError> {
        let args = self.args(input);
        debug!("Running {} {:?}", self.binary.display(), args);

        let status = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(self.stdout()?)
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| HandoffError::ResolverSpawnError {
                binary: self.binary.clone(),
                source,
            })?;

        if !status.success() {
            return Err(HandoffError::ResolverExitError {
                input: input.to_path_buf(),
                status,
            });
        }
        info!("massdns finished for {}", input.display());
        Ok(())
    }
}

/// Handoff used by `--stage-only`: reports each staged path and runs nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct StageOnly;

impl ResolverHandoff for StageOnly {
    async fn resolve(&self, input: &Path) -> Result<(), HandoffError> {
        info!("Staged input ready: {}", input.display());
        Ok(())
    }
}
