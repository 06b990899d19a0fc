//! `osconfig check` command

use anyhow::Result;

use crate::cli::CheckArgs;
use crate::commands::load_settings;
use osconfig::ops::{check, format_report};
use osconfig::Declarations;

pub fn execute(args: CheckArgs) -> Result<()> {
    let config = load_settings()?;
    let report = check(&args.facts, &Declarations::from_config(&config))?;

    print!("{}", format_report(&report));
    println!("\nProfile is valid.");

    Ok(())
}
