//! Common test utilities and helpers
//!
//! Shared fixtures for integration tests: temporary map files, disassembly
//! listings and config files laid out the way a real firmware build would
//! leave them.
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::fixtures;
//!
//! let project = fixtures::scenario_project()?;
//! // run fn-footprint against project.map_path() / project.disasm_path()
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod fixtures;
