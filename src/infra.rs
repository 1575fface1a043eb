//! Infrastructure traits for abstracting I/O operations.
//!
//! The analyzers and the config loader read their inputs through
//! [`FileSystem`] so tests can substitute an in-memory implementation.

use std::io;
use std::path::Path;

/// Trait for abstracting filesystem operations.
pub trait FileSystem {
    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Read the entire contents of a file as raw bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Returns `true` if the path points at an existing file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Real filesystem implementation that delegates to std::fs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
