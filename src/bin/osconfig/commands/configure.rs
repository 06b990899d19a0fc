//! `osconfig configure` command

use std::io::Write;

use anyhow::{anyhow, Context, Result};

use crate::cli::ConfigureArgs;
use crate::commands::load_settings;
use osconfig::emit::{EmitOptions, OutputFormat};
use osconfig::ops::{configure, ConfigureOptions};
use osconfig::util::diagnostic::suggestions;
use osconfig::Declarations;

pub fn execute(args: ConfigureArgs) -> Result<()> {
    let config = load_settings()?;

    let format = match args.format {
        Some(ref s) => s
            .parse::<OutputFormat>()
            .map_err(|e| anyhow!("{}\n{}", e, suggestions::UNKNOWN_FORMAT))?,
        None => config.format().unwrap_or_default(),
    };

    let mut emit = EmitOptions::from_config(&config.emit);
    if let Some(namespace) = args.namespace {
        emit.namespace = namespace;
    }
    if let Some(guard) = args.guard {
        emit.guard = guard;
    }

    let opts = ConfigureOptions {
        facts: args.facts,
        output: args.output,
        format,
        emit,
        declarations: Declarations::from_config(&config),
    };

    let result = configure(&opts)?;

    if result.output.is_none() {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(result.rendered.as_bytes())
            .context("failed to write to stdout")?;
    }

    Ok(())
}
