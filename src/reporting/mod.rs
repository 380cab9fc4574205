//! Result summaries and structured logging
//!
//! This module aggregates validation results into counts and the process
//! exit code, and wires up the `log` backend.

pub mod logging;
pub mod summary;

// Re-export commonly used items
pub use summary::{Summary, exit_code, issues};
