//! Configuration constants.
//!
//! This module defines the defaults and fixed values used by the staging
//! pipeline and the massdns handoff.

use std::time::Duration;

/// Well-known massdns install locations, probed in order when no override is given.
///
/// Only Linux and macOS layouts are covered.
pub const DEFAULT_MASSDNS_LOCATIONS: &[&str] = &["/usr/bin/massdns", "/usr/local/bin/massdns"];

/// Environment variable that can carry the massdns path override.
pub const MASSDNS_PATH_ENV: &str = "MASSDNS_PATH";

/// Prefix of the per-run workspace directory.
pub const WORKSPACE_PREFIX: &str = "massdns_runner";

// massdns invocation
/// Default number of concurrent lookups passed to massdns (`-s`)
pub const DEFAULT_THREADS: usize = 10_000;
/// Record type requested from massdns (`-t`)
pub const MASSDNS_RECORD_TYPE: &str = "A";
/// massdns output format (`-o`): simple text, answers only, with the queried name
pub const MASSDNS_OUTPUT_FORMAT: &str = "Snl";

// Cancellation
/// How long an interrupted run waits for in-flight staging to stop before
/// removing the workspace
pub const CANCEL_GRACE_PERIOD: Duration = Duration::from_secs(2);
/// Read buffer size used when capturing standard input
pub const CAPTURE_CHUNK_SIZE: usize = 64 * 1024;
