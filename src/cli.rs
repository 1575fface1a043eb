//! Command-line interface definition

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::cmd::AnalyzeOptions;

/// Reachable code-size calculator
///
/// fn-footprint combines a linker map and a disassembly listing to report how
/// many bytes a function costs once every function it calls is linked in.
#[derive(Parser, Debug)]
#[command(name = "fn-footprint", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long, global = true)]
    pub no_emoji: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// fn-footprint subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute own and total size of one or more functions
    Analyze {
        /// Linker map file (e.g. produced with -Wl,-Map=app.map)
        #[arg(value_name = "MAP")]
        map_file: PathBuf,

        /// Disassembly listing (objdump -d output)
        #[arg(value_name = "DISASM")]
        disasm_file: PathBuf,

        /// Root functions to measure
        #[arg(value_name = "ROOT", required = true)]
        roots: Vec<String>,

        /// Also treat unconditional branches (b, b.w) as tail calls
        #[arg(long)]
        tail_calls: bool,

        /// Call mnemonic to recognize (repeatable, replaces the default set)
        #[arg(short, long = "mnemonic", value_name = "MNEMONIC")]
        mnemonics: Vec<String>,

        /// Maximum breakdown rows per function
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    /// Options for the analyze command, if this is `analyze`
    pub fn analyze_options(&self) -> Option<AnalyzeOptions> {
        match self {
            Commands::Analyze {
                map_file,
                disasm_file,
                roots,
                tail_calls,
                mnemonics,
                limit,
                json,
            } => Some(AnalyzeOptions {
                map_file: map_file.clone(),
                disasm_file: disasm_file.clone(),
                roots: roots.clone(),
                tail_calls: *tail_calls,
                mnemonics: mnemonics.clone(),
                limit: *limit,
                json: *json,
            }),
            Commands::Completions { .. } => None,
        }
    }
}
