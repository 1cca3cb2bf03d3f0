//! Input staging for the external resolver.
//!
//! This module decides which enumeration modes apply to a run and
//! materializes each of them as a file massdns can read:
//! - **Bruteforce**: wordlist entries joined with the base domain
//! - **Capture**: standard input copied into the workspace
//! - **Reference**: an existing subdomain list, used in place

mod bruteforce;
mod passthrough;

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error_handling::StagingError;

// Re-export public API
pub use bruteforce::stage_bruteforce;
pub use passthrough::{stage_capture, stage_reference};

/// A single staging step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Generate candidates from the wordlist and base domain
    Bruteforce,
    /// Copy standard input into a staging file
    Capture,
    /// Pass the configured subdomain list through untouched
    Reference,
}

impl Strategy {
    /// Whether the staged file is created inside (and removed with) the workspace.
    pub fn owns_file(&self) -> bool {
        !matches!(self, Strategy::Reference)
    }

    /// Human-readable name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Bruteforce => "bruteforce",
            Strategy::Capture => "stdin capture",
            Strategy::Reference => "subdomain list",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully written input file ready for the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedInput {
    /// Path handed to the resolver
    pub path: PathBuf,
    /// Strategy that produced it
    pub strategy: Strategy,
}

/// Decides which strategies run, and in which order.
///
/// | stdin | wordlist | list | strategies |
/// |-------|----------|------|------------|
/// | yes   | yes      | any  | Bruteforce, Capture |
/// | yes   | no       | any  | Capture |
/// | no    | no       | yes  | Reference |
/// | no    | yes      | no   | Bruteforce |
/// | no    | yes      | yes  | Reference, Bruteforce |
///
/// # Errors
///
/// Returns `StagingError::InvalidConfigurationError` when no mode applies, or
/// when bruteforce is requested without a non-empty base domain.
pub fn select_strategies(config: &Config) -> Result<Vec<Strategy>, StagingError> {
    if config.bruteforce_requested() && config.domain.as_deref().map_or(true, str::is_empty) {
        return Err(StagingError::InvalidConfigurationError(
            "a base domain is required to bruteforce with a wordlist".to_string(),
        ));
    }

    let mut plan = Vec::with_capacity(2);
    if config.stdin {
        if config.subdomain_list_requested() {
            warn!("Reading subdomains from stdin; ignoring the configured subdomain list");
        }
        if config.bruteforce_requested() {
            plan.push(Strategy::Bruteforce);
        }
        plan.push(Strategy::Capture);
    } else {
        if config.subdomain_list_requested() {
            plan.push(Strategy::Reference);
        }
        if config.bruteforce_requested() {
            plan.push(Strategy::Bruteforce);
        }
    }

    if plan.is_empty() {
        return Err(StagingError::InvalidConfigurationError(
            "no input: provide a wordlist and domain, a subdomain list, or subdomains on stdin"
                .to_string(),
        ));
    }
    Ok(plan)
}

/// Runs every strategy in `plan`, in order, and returns the staged inputs.
///
/// Each strategy runs on the blocking thread pool. `stdin` is only read by
/// the capture strategy. Stops at the first failure; files already staged
/// stay in the workspace until it is released.
///
/// `cancel` is checked before every strategy and inside the bruteforce and
/// capture loops, which then end with `StagingError::InterruptedError`.
pub async fn stage_inputs<R>(
    config: &Config,
    plan: &[Strategy],
    workspace: &Path,
    stdin: R,
    cancel: &CancellationToken,
) -> Result<Vec<StagedInput>, StagingError>
where
    R: Read + Send + 'static,
{
    let mut stdin = Some(stdin);
    let mut staged = Vec::with_capacity(plan.len());

    for &strategy in plan {
        if cancel.is_cancelled() {
            return Err(StagingError::InterruptedError);
        }
        let workspace = workspace.to_path_buf();
        let cancel = cancel.clone();
        let path = match strategy {
            Strategy::Bruteforce => {
                let (wordlist, domain) = bruteforce_inputs(config)?;
                tokio::task::spawn_blocking(move || {
                    stage_bruteforce(&wordlist, &domain, &workspace, &cancel)
                })
                .await??
            }
            Strategy::Capture => {
                let mut reader = stdin.take().ok_or_else(|| {
                    StagingError::InvalidConfigurationError(
                        "standard input can only be captured once per run".to_string(),
                    )
                })?;
                tokio::task::spawn_blocking(move || {
                    stage_capture(&mut reader, &workspace, &cancel)
                })
                .await??
            }
            Strategy::Reference => {
                let list = config.subdomain_list.clone().ok_or_else(|| {
                    StagingError::InvalidConfigurationError(
                        "no subdomain list configured".to_string(),
                    )
                })?;
                tokio::task::spawn_blocking(move || stage_reference(&list)).await??
            }
        };

        if strategy.owns_file() {
            info!("Staged {} input at {}", strategy, path.display());
        } else {
            info!("Using {} {} in place", strategy, path.display());
        }
        staged.push(StagedInput { path, strategy });
    }

    Ok(staged)
}

fn bruteforce_inputs(config: &Config) -> Result<(PathBuf, String), StagingError> {
    match (&config.wordlist, &config.domain) {
        (Some(wordlist), Some(domain)) if !domain.is_empty() => {
            Ok((wordlist.clone(), domain.clone()))
        }
        _ => Err(StagingError::InvalidConfigurationError(
            "bruteforce needs both a wordlist and a base domain".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};
    use tempfile::TempDir;

    fn config(stdin: bool, wordlist: bool, list: bool) -> Config {
        Config {
            stdin,
            wordlist: wordlist.then(|| PathBuf::from("words.txt")),
            subdomain_list: list.then(|| PathBuf::from("subs.txt")),
            domain: wordlist.then(|| "example.com".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_selection_table() {
        use Strategy::*;

        let cases = [
            ((true, true, false), vec![Bruteforce, Capture]),
            ((true, true, true), vec![Bruteforce, Capture]),
            ((true, false, false), vec![Capture]),
            ((true, false, true), vec![Capture]),
            ((false, false, true), vec![Reference]),
            ((false, true, false), vec![Bruteforce]),
            ((false, true, true), vec![Reference, Bruteforce]),
        ];
        for ((stdin, wordlist, list), expected) in cases {
            let plan = select_strategies(&config(stdin, wordlist, list)).unwrap();
            assert_eq!(
                plan, expected,
                "stdin={stdin} wordlist={wordlist} list={list}"
            );
        }
    }

    #[test]
    fn test_nothing_configured_is_rejected() {
        let err = select_strategies(&config(false, false, false)).unwrap_err();
        assert!(matches!(err, StagingError::InvalidConfigurationError(_)));
    }

    #[test]
    fn test_wordlist_without_domain_is_rejected() {
        let mut cfg = config(false, true, false);
        cfg.domain = None;
        assert!(select_strategies(&cfg).is_err());

        cfg.domain = Some(String::new());
        assert!(select_strategies(&cfg).is_err());
    }

    #[test]
    fn test_strategy_ownership() {
        assert!(Strategy::Bruteforce.owns_file());
        assert!(Strategy::Capture.owns_file());
        assert!(!Strategy::Reference.owns_file());
    }

    #[tokio::test]
    async fn test_stage_inputs_bruteforce_then_capture() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let wordlist = temp_dir.path().join("words.txt");
        std::fs::write(&wordlist, "dev\n\nwww\n").unwrap();
        let workspace = temp_dir.path().join("ws");
        std::fs::create_dir(&workspace).unwrap();

        let cfg = Config {
            stdin: true,
            wordlist: Some(wordlist),
            domain: Some("example.com".to_string()),
            ..Default::default()
        };
        let plan = select_strategies(&cfg).unwrap();
        let stdin = Cursor::new(b"a.example.com\n".to_vec());

        let staged = stage_inputs(&cfg, &plan, &workspace, stdin, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(staged.len(), 2);
        assert_eq!(staged[0].strategy, Strategy::Bruteforce);
        assert_eq!(staged[1].strategy, Strategy::Capture);
        assert_ne!(staged[0].path, staged[1].path);
        assert_eq!(
            std::fs::read_to_string(&staged[0].path).unwrap(),
            "dev.example.com\nwww.example.com\n"
        );
        assert_eq!(
            std::fs::read_to_string(&staged[1].path).unwrap(),
            "a.example.com\n"
        );
    }

    #[tokio::test]
    async fn test_stage_inputs_reference_creates_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let list = temp_dir.path().join("known.txt");
        std::fs::write(&list, "a.example.com\n").unwrap();
        let workspace = temp_dir.path().join("ws");
        std::fs::create_dir(&workspace).unwrap();

        let cfg = Config {
            subdomain_list: Some(list.clone()),
            ..Default::default()
        };
        let plan = select_strategies(&cfg).unwrap();
        let staged = stage_inputs(
            &cfg,
            &plan,
            &workspace,
            io::empty(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(
            staged,
            vec![StagedInput {
                path: list,
                strategy: Strategy::Reference
            }]
        );
        assert_eq!(std::fs::read_dir(&workspace).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_stage_inputs_stops_at_first_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let list = temp_dir.path().join("known.txt");
        std::fs::write(&list, "a.example.com\n").unwrap();

        let cfg = Config {
            subdomain_list: Some(list),
            wordlist: Some(temp_dir.path().join("missing-words.txt")),
            domain: Some("example.com".to_string()),
            ..Default::default()
        };
        let plan = select_strategies(&cfg).unwrap();
        let err = stage_inputs(
            &cfg,
            &plan,
            temp_dir.path(),
            io::empty(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, StagingError::WordlistReadError { .. }));
    }

    #[tokio::test]
    async fn test_stage_inputs_cancelled_runs_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let workspace = temp_dir.path().join("ws");
        std::fs::create_dir(&workspace).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let cfg = config(true, false, false);
        let plan = select_strategies(&cfg).unwrap();
        let stdin = Cursor::new(b"a.example.com\n".to_vec());
        let err = stage_inputs(&cfg, &plan, &workspace, stdin, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, StagingError::InterruptedError));
        assert_eq!(std::fs::read_dir(&workspace).unwrap().count(), 0);
    }
}
