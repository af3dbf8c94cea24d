//! funccover: function-level coverage instrumentation for Rust sources
//!
//! ## Usage
//!
//! ```bash
//! funccover instrument --src src/main.rs --cover-var FuncCover_0 --out build/main.rs
//! funccover scan src/lib.rs --format json
//! ```

use clap::Parser;
use funccover_cli::{
    handlers::{run_instrument, run_scan},
    init_logging, Cli, CliResult, Commands, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.quiet, cli.verbose));

    match cli.command {
        Commands::Instrument(args) => run_instrument(&args),
        Commands::Scan(args) => run_scan(&args, &mut std::io::stdout().lock()),
    }
}
