//! Analyze command implementation
//!
//! Handles `fn-footprint analyze <MAP> <DISASM> <ROOT>...`: builds the symbol
//! table and call graph once, then reports the footprint of every root.

use anyhow::{Context, Result};
use console::style;
use std::env;
use std::path::{Path, PathBuf};

use crate::analyzer::{self, CallMnemonics, FootprintAnalyzer};
use crate::config::{ConfigFile, ConfigLoader};
use crate::error::FootprintError;
use crate::fmt::{CHART, MICROSCOPE};

/// Options for the analyze command
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Linker map file
    pub map_file: PathBuf,
    /// Disassembly listing (`objdump -d` output)
    pub disasm_file: PathBuf,
    /// Root functions to size
    pub roots: Vec<String>,
    /// Treat unconditional branches as tail calls
    pub tail_calls: bool,
    /// Explicit mnemonic set, overrides `tail_calls` and the config file
    pub mnemonics: Vec<String>,
    /// Maximum breakdown rows per root
    pub limit: Option<usize>,
    /// Output as JSON
    pub json: bool,
}

/// Run the analyze command using `.fn-footprint.toml` from the current directory
///
/// # Examples
///
/// ```no_run
/// use fn_footprint::cmd::analyze::{cmd_analyze, AnalyzeOptions};
///
/// let options = AnalyzeOptions {
///     map_file: "build/app.map".into(),
///     disasm_file: "build/app.lst".into(),
///     roots: vec!["arm_cfft_f32".to_string()],
///     ..Default::default()
/// };
/// cmd_analyze(&options)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - Either input file cannot be read (nothing is analyzed)
/// - The config file or a `--mnemonic` value is invalid
/// - Any root could not be resolved (reported after all roots are printed)
pub fn cmd_analyze(options: &AnalyzeOptions) -> Result<()> {
    let project_root = env::current_dir().map_err(|source| FootprintError::Io {
        context: "the current directory".to_string(),
        source,
    })?;
    cmd_analyze_in(options, &project_root)
}

/// Run the analyze command with config loaded from `project_root`
pub fn cmd_analyze_in(options: &AnalyzeOptions, project_root: &Path) -> Result<()> {
    let config = ConfigLoader::load(project_root)?;
    let mnemonics = resolve_mnemonics(options, &config)?;
    let limit = options.limit.or_else(|| config.report_limit());

    if !options.json {
        println!(
            "{} {} Code Footprint Analysis",
            MICROSCOPE,
            style("fn-footprint").bold()
        );
        println!("   Map:         {}", options.map_file.display());
        println!("   Disassembly: {}", options.disasm_file.display());
        println!(
            "   Calls:       {}",
            mnemonics.names().collect::<Vec<_>>().join(", ")
        );
        println!();
    }

    let analysis = FootprintAnalyzer::new(&options.map_file, &options.disasm_file)
        .with_mnemonics(mnemonics)
        .load()?;

    if !options.json {
        println!(
            "{} Parsed {} sized functions, {} call edges",
            CHART,
            style(analysis.symbols().len()).cyan(),
            style(analysis.graph().edge_count()).cyan()
        );
        println!();
    }

    let outcomes = analysis.measure_all(&options.roots);

    if options.json {
        analyzer::print_json_report(&outcomes).context("Failed to serialize report to JSON")?;
    } else {
        analyzer::print_footprint_report(&outcomes, limit);
    }

    let unresolved: Vec<String> = outcomes
        .iter()
        .filter(|outcome| outcome.result.is_err())
        .map(|outcome| outcome.root.clone())
        .collect();

    if !unresolved.is_empty() {
        return Err(FootprintError::UnresolvedRoots { names: unresolved }.into());
    }

    Ok(())
}

/// Pick the mnemonic set: `--mnemonic` > `--tail-calls` > config file > linked
pub fn resolve_mnemonics(options: &AnalyzeOptions, config: &ConfigFile) -> Result<CallMnemonics> {
    if !options.mnemonics.is_empty() {
        return Ok(CallMnemonics::custom(&options.mnemonics)?);
    }
    if options.tail_calls {
        return Ok(CallMnemonics::with_tail_calls());
    }
    Ok(config.call_mnemonics()?)
}
