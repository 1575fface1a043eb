#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! fn-footprint library
//!
//! Estimates the true code-size cost of functions in a compiled binary by
//! combining a linker map (function sizes) with a disassembly listing (call
//! edges). A function's total size counts every function it can reach
//! through direct calls exactly once.
//!
//! # Basic Example
//!
//! ```
//! use fn_footprint::analyzer::{build_call_graph, build_symbol_table, compute_total_size};
//! use fn_footprint::analyzer::CallMnemonics;
//!
//! let map = "\
//!  .text.main
//!                 0x08000100       0x40 main.o
//!  .text.init
//!                 0x08000140       0x20 main.o
//! ";
//! let listing = "\
//! 08000100 <main>:
//!  8000100:\tf000 f81e \tbl\t8000140 <init>
//! ";
//!
//! let symbols = build_symbol_table(map);
//! let graph = build_call_graph(listing, &CallMnemonics::linked());
//! let footprint = compute_total_size(&symbols, &graph, "main")?;
//!
//! assert_eq!(footprint.own_size, 0x40);
//! assert_eq!(footprint.total_size, 0x60);
//! # Ok::<(), fn_footprint::error::FootprintError>(())
//! ```

/// Map/disassembly parsing and reachable size computation
pub mod analyzer;
/// Command-line interface definition
pub mod cli;
/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file management
pub mod config;
/// Error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem access
pub mod infra;
