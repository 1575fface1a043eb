use clap::Parser;
use std::process;

use fn_footprint::cli::{Cli, Commands};
use fn_footprint::cmd;

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    // Set console emoji mode based on CLI flag
    if cli.no_emoji {
        std::env::set_var("NO_EMOJI", "1");
    }

    let result = match &cli.command {
        Some(command @ Commands::Analyze { .. }) => match command.analyze_options() {
            Some(options) => cmd::cmd_analyze(&options),
            None => Ok(()),
        },
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(*shell);
            Ok(())
        }
        None => {
            // No subcommand provided, show help
            println!("fn-footprint v{}", env!("CARGO_PKG_VERSION"));
            println!("Reachable code-size calculator\n");
            println!("Usage: fn-footprint <COMMAND>\n");
            println!("Commands:");
            println!("  analyze      Compute own and total size of one or more functions");
            println!("  completions  Generate shell completions");
            println!("\nRun 'fn-footprint <COMMAND> --help' for more information on a command.");
            Ok(())
        }
    };

    if let Err(e) = result {
        use fn_footprint::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
