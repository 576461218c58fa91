use clap::Parser;
use devkit_dispenser::CandidateOrder;

use super::OutputFormat;

/// Arguments for the dispense command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Build a bundle for the NVIDIA platform:\n    dispenser dispense kitA-NVIDIA-v2\n\n\
                  Print the JSON response:\n    dispenser dispense kitA-NVIDIA-v2 --format json\n\n\
                  Take licenses in filename order:\n    dispenser dispense kitA-NVIDIA-v2 --order lexical")]
pub struct DispenseArgs {
    /// Dev kit identifier; the platform is its second '-' separated segment
    pub identifier: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Order in which available licenses are tried (overrides the config file)
    #[arg(long, value_enum)]
    pub order: Option<CandidateOrder>,
}
