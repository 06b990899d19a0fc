//! `osconfig domains` command

use anyhow::Result;

use crate::commands::load_settings;
use osconfig::ops::format_declarations;
use osconfig::Declarations;

pub fn execute() -> Result<()> {
    let config = load_settings()?;
    print!("{}", format_declarations(&Declarations::from_config(&config)));
    Ok(())
}
