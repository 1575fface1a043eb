//! Configuration for fn-footprint
//!
//! An optional `.fn-footprint.toml` in the working directory selects the call
//! mnemonic set and the default breakdown row limit. Command-line flags take
//! precedence over the file.

pub mod file;
pub mod loader;

pub use file::{CallSettings, ConfigFile, ReportSettings, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;
