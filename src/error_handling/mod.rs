//! Error types for the staging pipeline.
//!
//! Errors are split by concern:
//! - **Initialization**: logger setup
//! - **Staging**: configuration, resolver discovery, workspace and staging files
//! - **Handoff**: launching the external resolver

mod types;

// Re-export public API
pub use types::{HandoffError, InitializationError, StagingError};
