//! gatectl - gate operator log diagnostics from the command line

use clap::Parser;
use gatectl::cli::{Cli, Command};
use gatectl::{commands, errors};
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so `--json` output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Analyze(args) => commands::analyze(&args),
        Command::Version => Ok(commands::version()),
    };

    let code = match result {
        Ok(output) => {
            println!("{output}");
            errors::EXIT_SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            errors::exit_code(&err)
        }
    };
    std::process::exit(code);
}
