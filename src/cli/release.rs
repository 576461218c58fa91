use clap::Parser;

/// Arguments for the release command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Return a license to the NVIDIA pool:\n    dispenser release lic1.txt --platform NVIDIA")]
pub struct ReleaseArgs {
    /// Filename of the license in used/
    pub filename: String,

    /// Platform bucket to return the license to (empty for the pool root)
    #[arg(long, short = 'p', default_value = "")]
    pub platform: String,
}
