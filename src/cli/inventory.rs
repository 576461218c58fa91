use clap::Parser;

use super::OutputFormat;

/// Arguments for the inventory command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show licenses left per platform:\n    dispenser inventory\n\n\
                  As JSON:\n    dispenser inventory --format json")]
pub struct InventoryArgs {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t)]
    pub format: OutputFormat,
}
