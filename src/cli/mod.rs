//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - dispense: Dispense command arguments
//! - inventory: Inventory command arguments
//! - release: Release command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod completions;
pub mod dispense;
pub mod inventory;
pub mod release;

pub use completions::CompletionsArgs;
pub use dispense::DispenseArgs;
pub use inventory::InventoryArgs;
pub use release::ReleaseArgs;

/// dispenser - dev kit and license dispenser
///
/// Bundle a dev kit with a single-use license from a platform-scoped pool.
#[derive(Parser, Debug)]
#[command(
    name = "dispenser",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Dispense dev kits bundled with single-use licenses",
    long_about = "Builds a zip holding a dev kit and exactly one license reserved from \
                  available/<platform>/. Reserved licenses move to used/ and are never \
                  handed out again, even to concurrent requests.",
    after_help = "Examples:\n   \
                  dispenser dispense kitA-NVIDIA-v2            # Build a bundle\n   \
                  dispenser dispense kitA-NVIDIA-v2 -f json    # Print the JSON response\n   \
                  dispenser inventory                          # Licenses left per platform\n   \
                  dispenser -r /srv/dispenser inventory        # Use another root\n"
)]
pub struct Cli {
    /// Dispenser root holding available/, used/, builds/ and dev-kit/
    #[arg(long, short = 'r', global = true, env = "DISPENSER_ROOT")]
    pub root: Option<PathBuf>,

    /// Configuration file (defaults to <root>/dispenser.yaml when present)
    #[arg(long, short = 'c', global = true, env = "DISPENSER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a dev kit bundle with a freshly reserved license
    Dispense(DispenseArgs),

    /// Show available licenses per platform
    Inventory(InventoryArgs),

    /// Return a used license to its platform's pool
    Release(ReleaseArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
