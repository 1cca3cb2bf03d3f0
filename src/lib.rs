//! massdns_runner library: input staging for massdns subdomain enumeration
//!
//! This library prepares candidate hostnames for the massdns resolver in two
//! modes, which may be combined in one run:
//! - brute-force: every wordlist entry joined with a base domain
//! - resolution of an existing subdomain list, from a file or standard input
//!
//! Each run owns a temporary workspace holding the staged files; the workspace
//! is removed when the run ends, whether it succeeded or not.
//!
//! # Example
//!
//! ```no_run
//! use massdns_runner::{run_enumeration, Config};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     wordlist: Some(PathBuf::from("words.txt")),
//!     domain: Some("example.com".to_string()),
//!     resolvers: Some(PathBuf::from("resolvers.txt")),
//!     ..Default::default()
//! };
//!
//! let report = run_enumeration(config).await?;
//! println!("Resolved {} staged input(s)", report.staged.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

#![warn(missing_docs)]

pub mod config;
pub mod error_handling;
pub mod handoff;
pub mod initialization;
mod run;
pub mod staging;
pub mod workspace;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{HandoffError, StagingError};
pub use run::{run_enumeration, run_enumeration_until, run_enumeration_with, EnumerationReport};
pub use staging::{StagedInput, Strategy};
