//! Catalog Pricing CLI
//!
//! Loads a catalog fixture, prices the `ITEM=QTY` selections given on the command line and
//! prints the receipt followed by the combo breakdown.

use std::{
    io::{self, Write},
    time::Instant,
};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::info;

use catalog_pricing::{
    cli::{PricingArgs, init_logging},
    fixtures::Catalog,
    receipt::Receipt,
};

/// Price the selection and print the receipt.
pub fn main() -> Result<()> {
    let args = PricingArgs::parse();

    init_logging(&args.logging)?;

    let catalog = Catalog::from_path(&args.catalog)?;
    let selection = catalog.selection_from_pairs(&args.selections)?;

    let start = Instant::now();
    let result = catalog.price(&selection);
    let elapsed = start.elapsed();

    info!(total = %result.total(), combos = result.applied_combos().len(), "priced selection");

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::new(&result, catalog.currency()).write_to(&mut handle)?;

    for line in result.breakdown() {
        writeln!(handle, " {line}")?;
    }

    writeln!(
        handle,
        "\n Priced in {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
