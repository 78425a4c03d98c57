mod classify;
mod project;
mod report;
mod util;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use classify::ClassifyArgs;
use project::ProjectArgs;
use tracing_subscriber::EnvFilter;

/// Eigenspace nearest neighbour tools
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value_t = String::from("warn"))]
    log_level: String,
    #[command(subcommand)]
    tool: Tool,
}

/// Eigenspace nearest neighbour tools
#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Tool {
    /// Classify a query by its nearest training observation
    #[command(version, about, long_about = None)]
    Classify(ClassifyArgs),

    /// Principal component analysis of the training data
    #[command(version, about, long_about = None)]
    Project(ProjectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.tool {
        Tool::Classify(args) => classify::classify_main(args),
        Tool::Project(args) => project::project_main(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
