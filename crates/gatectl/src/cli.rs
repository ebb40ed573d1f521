//! Command-line surface for gatectl

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gatectl")]
#[command(about = "Gate operator log diagnostics", long_about = None)]
#[command(version = gate_common::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a gate operator log file
    Analyze(AnalyzeArgs),

    /// Print the engine version
    Version,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Log file to analyze
    pub logfile: PathBuf,

    /// Emit the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Config file (defaults to $GATE_CONFIG, then /etc/gate/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
