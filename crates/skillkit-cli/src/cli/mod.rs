//! CLI argument definitions for skillkit.

pub mod prompt;
pub mod skills;

use clap::{Parser, Subcommand};

/// Install agent skills into local agent folders
#[derive(Parser, Debug)]
#[command(name = "skillkit", version, about = "Install agent skills from the registry, GitHub or local paths")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install one or more skills
    Add(AddArgs),
    /// Remove installed skills by name
    Remove(RemoveArgs),
    /// List installed skills for every agent and scope
    List,
    /// Show every installation of one skill
    Show(ShowArgs),
    /// Choose the default agents used when no --agent flag is passed
    Config,
    /// List skills available in the registry
    Catalog,
}

/// Arguments for `skillkit add`.
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Registry skill name, GitHub URL or local path
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Target agent (claude, codex); repeat for several
    #[arg(short, long = "agent", value_name = "AGENT")]
    pub agents: Vec<String>,

    /// Install into the home directory instead of the project
    #[arg(short, long)]
    pub global: bool,
}

/// Arguments for `skillkit remove`.
#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Installed skill name
    #[arg(required = true, value_name = "NAME")]
    pub names: Vec<String>,

    /// Target agent (claude, codex); repeat for several
    #[arg(short, long = "agent", value_name = "AGENT")]
    pub agents: Vec<String>,

    /// Remove from the home directory instead of the project
    #[arg(short, long)]
    pub global: bool,
}

/// Arguments for `skillkit show`.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Installed skill name
    pub name: String,
}
