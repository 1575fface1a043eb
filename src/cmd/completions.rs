//! Completions command implementation
//!
//! Handles the `fn-footprint completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::Write;

use crate::cli::Cli;

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
/// Users can redirect this to their shell's completion directory.
///
/// # Examples
///
/// ```bash
/// # Bash
/// fn-footprint completions bash > /etc/bash_completion.d/fn-footprint
///
/// # Zsh
/// fn-footprint completions zsh > ~/.zfunc/_fn-footprint
///
/// # Fish
/// fn-footprint completions fish > ~/.config/fish/completions/fn-footprint.fish
/// ```
pub fn cmd_completions(shell: Shell) {
    write_completions(shell, &mut std::io::stdout());
}

/// Write the completion script for `shell` into `out`
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
}
