//! Release command implementation
//!
//! Moves a used license back into a platform's available bucket.

use devkit_dispenser::{LicensePool, Platform, Result};

use super::Context;
use crate::cli::ReleaseArgs;

/// Run release command
pub fn run(context: &Context, args: ReleaseArgs) -> Result<()> {
    let platform = Platform::parse(&args.platform)?;
    let (config, layout) = context.load()?;

    let pool = LicensePool::open(
        &layout.available_dir,
        &layout.used_dir,
        config.candidate_order,
    );
    pool.release_named(&platform, &args.filename)?;

    println!("Released {} to platform '{}'", args.filename, platform);
    Ok(())
}
