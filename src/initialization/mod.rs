//! Application initialization.
//!
//! This module provides the one-time setup performed before any staging:
//! - Logger configuration
//! - massdns binary discovery

mod logger;
mod resolver;

// Re-export public API
pub use logger::init_logger_with;
pub use resolver::{default_locations, discover_resolver};
