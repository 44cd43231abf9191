//! vdocs CLI - Version-aware documentation routing.
//!
//! Provides commands for:
//! - `routes`: Register and list the pages of a build
//! - `fields`: Show the fields derived for every content node

mod collector;
mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{FieldsArgs, RoutesArgs};
use output::Output;

/// vdocs - Version-aware documentation routing.
#[derive(Parser)]
#[command(name = "vdocs", version, about)]
struct Cli {
    /// Enable verbose output (log pass summaries).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pages a build registers.
    Routes(RoutesArgs),
    /// Show derived fields per content node.
    Fields(FieldsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Routes(args) => args.execute(&output),
        Commands::Fields(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
