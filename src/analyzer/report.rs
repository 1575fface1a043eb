//! Footprint report formatting
//!
//! Console and JSON renderings of [`RootOutcome`]s. The console report lists,
//! per root, its own size, its total reachable size and the breakdown sorted
//! by size.

use console::style;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

use super::sizer::{BreakdownEntry, Footprint};
use super::RootOutcome;
use crate::fmt::{format_bytes, format_number, truncate_str, CROSSMARK, MICROSCOPE, PACKAGE};

const NAME_WIDTH: usize = 40;

/// Format outcomes for console output
///
/// `limit` caps the number of breakdown rows printed per root; the remainder
/// is summarized in a single line.
pub fn format_console_report(
    outcomes: &[RootOutcome],
    limit: Option<usize>,
) -> Result<String, fmt::Error> {
    let mut output = String::new();

    for (i, outcome) in outcomes.iter().enumerate() {
        if i > 0 {
            writeln!(output, "{}", style("─".repeat(60)).dim())?;
        }

        writeln!(
            output,
            "{} {} {}",
            MICROSCOPE,
            style("Function:").bold(),
            style(&outcome.root).cyan().bold()
        )?;

        match &outcome.result {
            Ok(footprint) => write_footprint(&mut output, footprint, limit)?,
            Err(e) => writeln!(output, "   {} {}", CROSSMARK, style(e).red())?,
        }
    }

    Ok(output)
}

fn write_footprint(
    output: &mut String,
    footprint: &Footprint,
    limit: Option<usize>,
) -> fmt::Result {
    writeln!(
        output,
        "   Own size:   {:>10} bytes",
        format_number(footprint.own_size)
    )?;
    writeln!(
        output,
        "   Total size: {:>10} bytes ({}, {} functions)",
        style(format_number(footprint.total_size)).green().bold(),
        format_bytes(footprint.total_size),
        footprint.function_count()
    )?;
    writeln!(output)?;

    writeln!(output, "   {} {}", PACKAGE, style("Breakdown (including dependencies):").bold())?;

    let sorted = footprint.sorted_breakdown();
    let shown = limit.unwrap_or(sorted.len()).min(sorted.len());

    for entry in sorted.iter().take(shown) {
        let name = truncate_str(&entry.name, NAME_WIDTH);
        let size = format!("{:>8}", format_number(entry.size));
        let size = if entry.size == 0 {
            style(size).dim()
        } else {
            style(size).cyan()
        };
        writeln!(output, "      {:<width$} {} bytes", name, size, width = NAME_WIDTH)?;
    }

    if sorted.len() > shown {
        let rest = &sorted[shown..];
        let rest_size: u64 = rest.iter().map(|e| e.size).sum();
        writeln!(
            output,
            "      {} {} more functions ({} bytes)",
            style("...").dim(),
            rest.len(),
            format_number(rest_size)
        )?;
    }

    writeln!(output)
}

/// Print outcomes to stdout
pub fn print_footprint_report(outcomes: &[RootOutcome], limit: Option<usize>) {
    match format_console_report(outcomes, limit) {
        Ok(report) => print!("{}", report),
        Err(e) => eprintln!("Failed to format report: {}", e),
    }
}

/// JSON document for a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// One entry per requested root, in request order
    pub roots: Vec<JsonRoot>,
}

/// JSON entry for one root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JsonRoot {
    /// Root was sized
    Ok {
        /// Root function name
        root: String,
        /// Root's own size in bytes
        own_size: u64,
        /// Reachable size in bytes
        total_size: u64,
        /// Number of reachable functions
        functions: usize,
        /// Breakdown sorted by size, largest first
        breakdown: Vec<BreakdownEntry>,
    },
    /// Root was not found in either input
    Unknown {
        /// Root function name
        root: String,
        /// Error message
        error: String,
    },
}

impl JsonReport {
    /// Convert outcomes into the JSON document layout
    pub fn from_outcomes(outcomes: &[RootOutcome]) -> Self {
        let roots = outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(footprint) => JsonRoot::Ok {
                    root: footprint.root.clone(),
                    own_size: footprint.own_size,
                    total_size: footprint.total_size,
                    functions: footprint.function_count(),
                    breakdown: footprint.sorted_breakdown(),
                },
                Err(e) => JsonRoot::Unknown {
                    root: outcome.root.clone(),
                    error: e.to_string(),
                },
            })
            .collect();

        Self { roots }
    }
}

/// Print outcomes as pretty JSON to stdout
pub fn print_json_report(outcomes: &[RootOutcome]) -> serde_json::Result<()> {
    let report = JsonReport::from_outcomes(outcomes);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
