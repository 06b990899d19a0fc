//! osconfig CLI - platform capability profiles for C/C++ builds

use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use osconfig::util::diagnostic::{self, suggestions};
use osconfig::ConfigureError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && io::stderr().is_terminal();
    let verbose = cli.verbose;
    let facts = cli.command.facts().map(Path::to_path_buf);

    if let Err(e) = run(cli) {
        // Configuration errors carry their own context and suggestions
        match e.chain().find_map(|cause| cause.downcast_ref::<ConfigureError>()) {
            Some(err) => {
                let mut diag = err.to_diagnostic();
                diag.message = format!("{:#}", e);
                if let Some(path) = facts {
                    diag = diag.with_location(path);
                }
                diagnostic::emit(&diag, color);
            }
            None => {
                eprintln!("error: {:#}", e);
                if !verbose {
                    eprintln!("{}", suggestions::RERUN_VERBOSE);
                }
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("osconfig=debug")
    } else {
        EnvFilter::new("osconfig=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let color = !cli.no_color && io::stderr().is_terminal();
    match cli.command {
        Commands::Configure(args) => commands::configure::execute(args),
        Commands::Check(args) => commands::check::execute(args),
        Commands::Query(args) => commands::query::execute(args, color),
        Commands::Domains => commands::domains::execute(),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
