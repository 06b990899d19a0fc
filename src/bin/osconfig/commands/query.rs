//! `osconfig query` command
//!
//! Prints one `NAME = value` line per name; undetected names print `unknown`.

use anyhow::Result;

use crate::cli::QueryArgs;
use crate::commands::load_settings;
use osconfig::ops::query;
use osconfig::util::diagnostic::{self, suggestions, Diagnostic};
use osconfig::Declarations;

pub fn execute(args: QueryArgs, color: bool) -> Result<()> {
    let config = load_settings()?;
    let answers = query(&args.facts, &args.names, &Declarations::from_config(&config))?;

    for answer in &answers {
        println!("{}", answer);
    }

    let unknown: Vec<&str> = answers
        .iter()
        .filter(|a| a.value.is_none())
        .map(|a| a.name.as_str())
        .collect();
    if !unknown.is_empty() {
        let diag = Diagnostic::warning(format!("not detected: {}", unknown.join(", ")))
            .with_location(&args.facts);
        diagnostic::emit(&diag, color);
        eprintln!("{}", suggestions::UNKNOWN_CAPABILITY);
    }

    Ok(())
}
