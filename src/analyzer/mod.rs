//! Code footprint analysis
//!
//! Combines a linker map and a disassembly listing to compute how many bytes
//! a function really costs once everything it calls is linked in:
//! - [`symbols`]: map file parsing (function -> address, size)
//! - [`callgraph`]: disassembly parsing (function -> callees)
//! - [`sizer`]: deduplicated reachable size per root
//! - [`report`]: console and JSON output
//!
//! # Examples
//!
//! ```no_run
//! use fn_footprint::analyzer::FootprintAnalyzer;
//!
//! let analysis = FootprintAnalyzer::new("build/app.map", "build/app.lst").load()?;
//! let footprint = analysis.measure("arm_cfft_f32")?;
//!
//! println!("{} bytes including callees", footprint.total_size);
//! # Ok::<(), fn_footprint::error::FootprintError>(())
//! ```

pub mod callgraph;
pub mod report;
pub mod sizer;
pub mod symbols;

pub use callgraph::{build_call_graph, CallGraph, CallMnemonics, CallPreset};
pub use report::{print_footprint_report, print_json_report, JsonReport};
pub use sizer::{compute_total_size, BreakdownEntry, Footprint};
pub use symbols::{build_symbol_table, FunctionRecord, SymbolTable};

use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::error::FootprintError;
use crate::infra::{FileSystem, RealFileSystem};

/// Loads a map file and a disassembly listing and builds both tables
pub struct FootprintAnalyzer<FS: FileSystem = RealFileSystem> {
    map_file: PathBuf,
    disasm_file: PathBuf,
    mnemonics: CallMnemonics,
    fs: FS,
}

impl FootprintAnalyzer {
    /// Create an analyzer reading from the real filesystem
    pub fn new(map_file: impl Into<PathBuf>, disasm_file: impl Into<PathBuf>) -> Self {
        Self::with_fs(map_file, disasm_file, RealFileSystem)
    }
}

impl<FS: FileSystem> FootprintAnalyzer<FS> {
    /// Create an analyzer with a custom filesystem implementation
    pub fn with_fs(
        map_file: impl Into<PathBuf>,
        disasm_file: impl Into<PathBuf>,
        fs: FS,
    ) -> Self {
        Self {
            map_file: map_file.into(),
            disasm_file: disasm_file.into(),
            mnemonics: CallMnemonics::default(),
            fs,
        }
    }

    /// Use a different set of call mnemonics
    pub fn with_mnemonics(mut self, mnemonics: CallMnemonics) -> Self {
        self.mnemonics = mnemonics;
        self
    }

    /// Read both inputs and build the symbol table and call graph
    ///
    /// Fails with [`FootprintError::MissingResource`] if either input cannot
    /// be read; nothing is parsed in that case.
    #[must_use = "The loaded analysis is needed to measure root functions"]
    pub fn load(&self) -> Result<Analysis, FootprintError> {
        let map_text = self.read_input(&self.map_file)?;
        let disasm_text = self.read_input(&self.disasm_file)?;

        let symbols = build_symbol_table(&map_text);
        log::debug!(
            "parsed {} function records from {}",
            symbols.len(),
            self.map_file.display()
        );

        log::debug!(
            "call mnemonics: {}",
            self.mnemonics.names().collect::<Vec<_>>().join(", ")
        );
        let graph = build_call_graph(&disasm_text, &self.mnemonics);
        log::debug!(
            "parsed {} functions and {} call edges from {}",
            graph.function_count(),
            graph.edge_count(),
            self.disasm_file.display()
        );

        Ok(Analysis { symbols, graph })
    }

    fn read_input(&self, path: &Path) -> Result<String, FootprintError> {
        if !self.fs.is_file(path) {
            return Err(FootprintError::MissingResource {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a file"),
            });
        }
        let bytes = self
            .fs
            .read(path)
            .map_err(|source| FootprintError::MissingResource {
                path: path.to_path_buf(),
                source,
            })?;

        // Object paths in maps are often Latin-1; bad bytes only affect their own line
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) => {
                log::warn!("{} is not valid UTF-8, replacing invalid bytes", path.display());
                Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
            }
        }
    }
}

/// Result of sizing a single root
#[derive(Debug)]
pub struct RootOutcome {
    /// Requested root name
    pub root: String,
    /// Footprint, or the reason the root could not be sized
    pub result: Result<Footprint, FootprintError>,
}

/// Symbol table and call graph of one binary, immutable once built
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    symbols: SymbolTable,
    graph: CallGraph,
}

impl Analysis {
    /// Parsed map file
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Parsed disassembly
    pub fn graph(&self) -> &CallGraph {
        &self.graph
    }

    /// Size one root function
    pub fn measure(&self, root: &str) -> Result<Footprint, FootprintError> {
        let result = compute_total_size(&self.symbols, &self.graph, root);
        match &result {
            Ok(footprint) => log::debug!(
                "{}: own {} bytes, total {} bytes over {} functions",
                root,
                footprint.own_size,
                footprint.total_size,
                footprint.function_count()
            ),
            Err(e) => log::warn!("{}", e),
        }
        result
    }

    /// Size several roots in parallel
    ///
    /// Outcomes are returned in the order the roots were given. An unknown
    /// root does not affect the others.
    pub fn measure_all<S: AsRef<str> + Sync>(&self, roots: &[S]) -> Vec<RootOutcome> {
        roots
            .par_iter()
            .map(|root| {
                let root = root.as_ref();
                RootOutcome {
                    root: root.to_string(),
                    result: self.measure(root),
                }
            })
            .collect()
    }
}
