//! Error types with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes
//! - Proper exit codes for scripts and CI
//!
//! # Examples
//!
//! ```no_run
//! use fn_footprint::analyzer::FootprintAnalyzer;
//!
//! let analyzer = FootprintAnalyzer::new("build/app.map", "build/app.lst");
//!
//! match analyzer.load() {
//!     Ok(analysis) => {
//!         println!("Loaded {} symbols", analysis.symbols().len());
//!     }
//!     Err(e) => {
//!         eprintln!("Analysis failed: {}", e);
//!         std::process::exit(e.exit_code());
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// fn-footprint errors with contextual suggestions
#[derive(Error, Debug)]
pub enum FootprintError {
    /// A required input text could not be read
    #[error("Input file not found or unreadable: {}", path.display())]
    MissingResource {
        /// Path to the missing input
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Root function observed in neither the size map nor the disassembly
    #[error("Function '{name}' not found in map or disassembly")]
    UnknownRoot {
        /// Requested root name
        name: String,
    },

    /// One or more requested roots could not be resolved
    #[error("{} root function(s) could not be resolved: {}", names.len(), names.join(", "))]
    UnresolvedRoots {
        /// Names of the unresolved roots
        names: Vec<String>,
    },

    /// Call mnemonic that cannot be matched as a single token
    #[error("Invalid call mnemonic: '{mnemonic}'")]
    InvalidMnemonic {
        /// Offending mnemonic
        mnemonic: String,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl FootprintError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use fn_footprint::error::FootprintError;
    ///
    /// let error = FootprintError::UnknownRoot {
    ///     name: "arm_cfft_f3".to_string(),
    /// };
    ///
    /// let suggestion = error.suggestion().unwrap();
    /// assert!(suggestion.contains("arm_cfft_f3"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::MissingResource { path, .. } => Some(format!(
                "Check that {} exists and is readable. \
                 Generate the map with -Wl,-Map and the listing with objdump -d",
                path.display()
            )),
            Self::UnknownRoot { name } => Some(format!(
                "Check the spelling of '{}' and that it was built with -ffunction-sections",
                name
            )),
            Self::UnresolvedRoots { .. } => Some(
                "Unresolved roots are listed above; the remaining roots were still analyzed"
                    .to_string(),
            ),
            Self::InvalidMnemonic { .. } => Some(
                "Mnemonics must be single non-empty tokens, e.g. --mnemonic bl --mnemonic blx"
                    .to_string(),
            ),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get appropriate exit code for this error, following sysexits.h conventions.
    ///
    /// # Examples
    ///
    /// ```
    /// use fn_footprint::error::FootprintError;
    ///
    /// let error = FootprintError::UnresolvedRoots {
    ///     names: vec!["main".to_string()],
    /// };
    /// assert_eq!(error.exit_code(), 65);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingResource { .. } => 66, // EX_NOINPUT
            Self::UnknownRoot { .. } => 65,     // EX_DATAERR
            Self::UnresolvedRoots { .. } => 65, // EX_DATAERR
            Self::InvalidMnemonic { .. } => 64, // EX_USAGE
            Self::Io { .. } => 74,              // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with cause chain and suggestions
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        // Error chain (caused by)
        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(fp_error) = error.downcast_ref::<FootprintError>() {
            if let Some(suggestion) = fp_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(fp_error) = error.downcast_ref::<FootprintError>() {
            fp_error.exit_code()
        } else {
            1 // Generic error
        }
    }
}
