//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `massdns_runner` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use massdns_runner::config::{Opt, StdinSource};
use massdns_runner::initialization::init_logger_with;
use massdns_runner::run_enumeration;

#[tokio::main]
async fn main() -> Result<()> {
    // MASSDNS_PATH may come from a .env file, in the current directory or
    // next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();
    let config = opt.into_config(StdinSource::detect());

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    match run_enumeration(config).await {
        Ok(report) => {
            // stdout may carry massdns results, so the summary goes to stderr
            eprintln!(
                "✅ Staged {} input{} in {:.1}s",
                report.staged.len(),
                if report.staged.len() == 1 { "" } else { "s" },
                report.elapsed_seconds
            );
            for input in &report.staged {
                let note = if input.strategy.owns_file() {
                    ", removed"
                } else {
                    ""
                };
                eprintln!("  {} ({}{})", input.path.display(), input.strategy, note);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("massdns_runner error: {:#}", e);
            process::exit(1);
        }
    }
}
