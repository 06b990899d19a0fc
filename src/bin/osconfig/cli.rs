//! CLI definitions using clap.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// osconfig - Resolve platform facts into a validated capability profile
#[derive(Parser)]
#[command(name = "osconfig")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a fact sheet and write the profile (header or JSON)
    Configure(ConfigureArgs),

    /// Resolve and validate a fact sheet without writing anything
    Check(CheckArgs),

    /// Print capability values or backend choices from a resolved profile
    Query(QueryArgs),

    /// List declared backend domains and standard gates
    Domains,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Commands {
    /// The fact sheet this command reads, if any.
    pub fn facts(&self) -> Option<&Path> {
        match self {
            Commands::Configure(args) => Some(&args.facts),
            Commands::Check(args) => Some(&args.facts),
            Commands::Query(args) => Some(&args.facts),
            Commands::Domains | Commands::Completions(_) => None,
        }
    }
}

#[derive(Args)]
pub struct ConfigureArgs {
    /// Fact sheet (TOML, or JSON with a .json extension)
    pub facts: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (header, json)
    #[arg(long)]
    pub format: Option<String>,

    /// Namespace for backend constants (default DCMTK)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Include guard for the header (default OSCONFIG_H)
    #[arg(long)]
    pub guard: Option<String>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Fact sheet (TOML, or JSON with a .json extension)
    pub facts: PathBuf,
}

#[derive(Args)]
pub struct QueryArgs {
    /// Fact sheet (TOML, or JSON with a .json extension)
    pub facts: PathBuf,

    /// Capability or domain names
    #[arg(required = true)]
    pub names: Vec<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
