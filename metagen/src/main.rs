//! metagen command-line entry point.

use clap::Parser;
use metagen::cli::{Cli, init_tracing, run};
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    match run(&cli) {
        Ok(Some(code)) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(code.as_bytes()) {
                eprintln!("error: failed to write to stdout: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "generation failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
