#![deny(missing_docs)]

//! # OpenAPI Zod CLI
//!
//! Command Line Interface for the OpenAPI schema compiler.
//!
//! Supported Commands:
//! - `compile`: OpenAPI document -> validation IR (JSON).
//! - `check`: compiles without writing output and reports warnings.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod compile;
mod error;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI to validation schema compiler")]
struct Cli {
    /// Log compiler progress (overridden by `RUST_LOG`).
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a document and write the IR.
    Compile(compile::CompileArgs),
    /// Compile a document and only report diagnostics.
    Check(compile::CheckArgs),
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Compile(args) => compile::execute(args)?,
        Commands::Check(args) => compile::check(args)?,
    }

    Ok(())
}
