//! `osconfig completions` command

use anyhow::Result;
use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};

/// Print a completion script for the requested shell to stdout.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let mut stdout = std::io::stdout().lock();

    clap_complete::generate(args.shell, &mut cmd, "osconfig", &mut stdout);
    Ok(())
}
