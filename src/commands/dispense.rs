//! Dispense command implementation
//!
//! Runs the dispense pipeline for one identifier and prints the response.

use console::Style;

use devkit_dispenser::{DispenseResponse, Dispensed, Dispenser, Result};

use super::Context;
use crate::cli::{DispenseArgs, OutputFormat};

/// Run dispense command
pub fn run(context: &Context, args: DispenseArgs) -> Result<()> {
    let (mut config, layout) = context.load()?;
    if let Some(order) = args.order {
        config.candidate_order = order;
    }

    layout.ensure_output_dirs()?;

    let dispenser = Dispenser::open(&layout, &config);
    let result = dispenser.dispense(args.identifier.as_deref());

    match args.format {
        OutputFormat::Json => println!("{}", DispenseResponse::from_result(&result).to_json()?),
        OutputFormat::Text => {
            if let Ok(dispensed) = &result {
                print_dispensed(dispensed);
            }
        }
    }

    result.map(|_| ())
}

fn print_dispensed(dispensed: &Dispensed) {
    println!(
        "{} {}",
        Style::new().bold().green().apply_to("Built"),
        dispensed.archive_name()
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Dev kit:"),
        dispensed.devkit.path().display()
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("License:"),
        dispensed.license.filename
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Archive:"),
        dispensed.archive_path().display()
    );
}
