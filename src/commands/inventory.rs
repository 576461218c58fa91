//! Inventory command implementation
//!
//! Lists available licenses per platform and the number already used.

use console::Style;

use devkit_dispenser::{Inventory, LicensePool, Result};

use super::Context;
use crate::cli::{InventoryArgs, OutputFormat};

/// Run inventory command
pub fn run(context: &Context, args: InventoryArgs) -> Result<()> {
    let (config, layout) = context.load()?;
    let pool = LicensePool::open(
        &layout.available_dir,
        &layout.used_dir,
        config.candidate_order,
    );
    let inventory = pool.inventory()?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&inventory)?),
        OutputFormat::Text => print_inventory(&inventory),
    }

    Ok(())
}

fn print_inventory(inventory: &Inventory) {
    if inventory.available.is_empty() {
        println!("No available licenses.");
    } else {
        println!("Available licenses ({}):", inventory.total_available());
        for (platform, count) in &inventory.available {
            let name = if platform.is_empty() {
                "(no platform)"
            } else {
                platform.as_str()
            };
            let count_style = if *count == 0 {
                Style::new().red()
            } else {
                Style::new()
            };
            println!(
                "  {} {}",
                Style::new().bold().yellow().apply_to(format!("{name}:")),
                count_style.apply_to(count)
            );
        }
    }
    println!(
        "{} {}",
        Style::new().bold().apply_to("Used:"),
        inventory.used
    );
}
