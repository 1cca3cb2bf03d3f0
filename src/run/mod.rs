//! Enumeration run orchestration.
//!
//! Ties the pipeline together: configuration checks, resolver discovery,
//! workspace acquisition, staging, handoff, and workspace release on every
//! exit path.

use std::future::Future;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::config::{Config, CANCEL_GRACE_PERIOD};
use crate::error_handling::StagingError;
use crate::handoff::{MassdnsHandoff, ResolverHandoff, StageOnly};
use crate::initialization::{default_locations, discover_resolver};
use crate::staging::{select_strategies, stage_inputs, StagedInput, Strategy};
use crate::workspace::Workspace;

/// Summary of a completed enumeration run.
#[derive(Debug, Clone)]
pub struct EnumerationReport {
    /// Inputs handed to the resolver, in staging order
    pub staged: Vec<StagedInput>,
    /// Workspace used by the run (already removed)
    pub workspace: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Runs one enumeration with the provided configuration.
///
/// Standard input is captured when `config.stdin` is set. Unless
/// `config.stage_only` is set, massdns is launched once per staged file.
///
/// # Errors
///
/// Fails with `StagingError::InvalidConfigurationError` or
/// `StagingError::ResolverNotFoundError` before any workspace exists, and
/// with staging or handoff errors afterwards. The workspace is removed in
/// every case.
///
/// # Example
///
/// ```no_run
/// use massdns_runner::{run_enumeration, Config};
/// use std::path::PathBuf;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config {
///     subdomain_list: Some(PathBuf::from("subs.txt")),
///     resolvers: Some(PathBuf::from("resolvers.txt")),
///     ..Default::default()
/// };
/// let report = run_enumeration(config).await?;
/// println!("Resolved {} input file(s)", report.staged.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_enumeration(config: Config) -> Result<EnumerationReport> {
    let plan = select_strategies(&config)?;

    let massdns = discover_resolver(&default_locations(), config.massdns_path.as_deref())?;
    info!("Using massdns binary {}", massdns.display());

    let stdin = std::io::stdin();
    if config.stage_only {
        execute(config, plan, stdin, &StageOnly, interrupt_signal()).await
    } else {
        let handoff = MassdnsHandoff::new(massdns, &config)?;
        execute(config, plan, stdin, &handoff, interrupt_signal()).await
    }
}

/// Runs the staging pipeline with an explicit input stream and handoff.
///
/// `stdin` stands in for the process's standard input and is only read when
/// `config.stdin` is set. Every staged file is closed before the first
/// `handoff` call. Ctrl-C aborts the run with `StagingError::InterruptedError`.
pub async fn run_enumeration_with<R, H>(
    config: Config,
    stdin: R,
    handoff: &H,
) -> Result<EnumerationReport>
where
    R: Read + Send + 'static,
    H: ResolverHandoff + Sync,
{
    run_enumeration_until(config, stdin, handoff, interrupt_signal()).await
}

/// Like [`run_enumeration_with`], but stops when `shutdown` completes
/// instead of on Ctrl-C.
///
/// On shutdown, in-flight staging is told to stop and given
/// `CANCEL_GRACE_PERIOD` to do so before the workspace is removed. The run
/// then fails with `StagingError::InterruptedError`.
pub async fn run_enumeration_until<R, H, S>(
    config: Config,
    stdin: R,
    handoff: &H,
    shutdown: S,
) -> Result<EnumerationReport>
where
    R: Read + Send + 'static,
    H: ResolverHandoff + Sync,
    S: Future,
{
    let plan = select_strategies(&config)?;
    execute(config, plan, stdin, handoff, shutdown).await
}

/// Resolves on Ctrl-C, or never when the signal cannot be installed.
async fn interrupt_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn execute<R, H, S>(
    config: Config,
    plan: Vec<Strategy>,
    stdin: R,
    handoff: &H,
    shutdown: S,
) -> Result<EnumerationReport>
where
    R: Read + Send + 'static,
    H: ResolverHandoff + Sync,
    S: Future,
{
    let start_time = Instant::now();

    let mut workspace = Workspace::acquire(&config.directory)?;
    let workspace_path = workspace.path().to_path_buf();
    info!("Using workspace {}", workspace_path.display());

    let cancel = CancellationToken::new();
    let outcome = {
        let work = stage_and_resolve(&config, &plan, &workspace, stdin, handoff, &cancel);
        tokio::pin!(work);

        tokio::select! {
            result = &mut work => result,
            _ = shutdown => {
                warn!("Interrupted, cleaning up workspace");
                cancel.cancel();
                // Staging threads must stop writing before the workspace goes away
                if tokio::time::timeout(CANCEL_GRACE_PERIOD, &mut work).await.is_err() {
                    warn!("Staging did not stop within {:?}", CANCEL_GRACE_PERIOD);
                }
                Err(StagingError::InterruptedError.into())
            }
        }
    };

    if let Err(e) = workspace.release() {
        warn!(
            "Failed to remove workspace {}: {}",
            workspace_path.display(),
            e
        );
    }

    let staged = outcome?;
    Ok(EnumerationReport {
        staged,
        workspace: workspace_path,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}

async fn stage_and_resolve<R, H>(
    config: &Config,
    plan: &[Strategy],
    workspace: &Workspace,
    stdin: R,
    handoff: &H,
    cancel: &CancellationToken,
) -> Result<Vec<StagedInput>>
where
    R: Read + Send + 'static,
    H: ResolverHandoff + Sync,
{
    let staged = stage_inputs(config, plan, workspace.path(), stdin, cancel)
        .await
        .context("Failed to stage resolver input")?;

    for input in &staged {
        if cancel.is_cancelled() {
            return Err(StagingError::InterruptedError.into());
        }
        handoff
            .resolve(&input.path)
            .await
            .with_context(|| format!("Failed to resolve {} input", input.strategy))?;
    }
    Ok(staged)
}
