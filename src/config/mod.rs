//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (binary locations, massdns defaults)
//! - The library `Config` and the CLI `Opt` it is built from

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, Opt, StdinSource};
