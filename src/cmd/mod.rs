//! Command handlers for the fn-footprint CLI
//!
//! Each submodule handles a specific CLI command.

pub mod analyze;
pub mod completions;

// Re-export command functions for convenient access
pub use analyze::{cmd_analyze, AnalyzeOptions};
pub use completions::cmd_completions;
