//! dispenser - dev kit and license dispenser
//!
//! Command-line host for the dispense pipeline: takes an identifier, prints
//! the structured response, and offers operator commands for the pool.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence; otherwise `-v` raises the level from `warn`.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let context = commands::Context::new(cli.root, cli.config);

    let result = match cli.command {
        Commands::Dispense(args) => commands::dispense::run(&context, args),
        Commands::Inventory(args) => commands::inventory::run(&context, args),
        Commands::Release(args) => commands::release::run(&context, args),
        Commands::Completions(args) => commands::completions::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(help) = miette::Diagnostic::help(&e) {
                eprintln!("  help: {}", help);
            }
            ExitCode::FAILURE
        }
    }
}
