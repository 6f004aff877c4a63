//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    cache::CacheCommands,
    category::CategoryCommands,
    completions::CompletionsArgs,
    config::ConfigCommands,
    login::{LoginArgs, WhoamiArgs},
    project::ProjectCommands,
    status::StatusArgs,
    unit::UnitCommands,
    wing::WingCommands,
};

#[derive(Parser)]
#[command(name = "vit")]
#[command(author, version, about = "Vantage Inventory Toolkit")]
#[command(
    long_about = "Vantage Inventory Toolkit - an admin console for real-estate inventory: manage projects, wings, and units over a remote API with a local query cache."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Assume "yes" for destructive confirmations
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Base URL of the inventory API
    #[arg(long, global = true, env = "VIT_BASE_URL")]
    pub base_url: Option<String>,

    /// Directory for config, session, and cache state
    #[arg(long, global = true, env = "VIT_STATE_DIR")]
    pub state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login(LoginArgs),

    /// Clear the stored session
    Logout,

    /// Show the signed-in identity
    Whoami(WhoamiArgs),

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Category and subcategory management
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Wing/tower management within a project
    #[command(subcommand)]
    Wing(WingCommands),

    /// Unit management within a wing
    #[command(subcommand)]
    Unit(UnitCommands),

    /// Show the dashboard
    Status(StatusArgs),

    /// Inspect or clear the local query cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Show effective configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table for lists, YAML for single records
    #[default]
    Auto,
    /// Rendered table
    Table,
    /// JSON (for programs)
    Json,
    /// YAML (full fidelity)
    Yaml,
    /// CSV (for spreadsheets)
    Csv,
    /// Just IDs, one per line
    Id,
}

/// Shared active/inactive filter for list commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ActiveFilter {
    Active,
    Inactive,
    #[default]
    All,
}

impl ActiveFilter {
    pub fn keeps(&self, active: bool) -> bool {
        match self {
            ActiveFilter::Active => active,
            ActiveFilter::Inactive => !active,
            ActiveFilter::All => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_active_filter() {
        assert!(ActiveFilter::Active.keeps(true));
        assert!(!ActiveFilter::Active.keeps(false));
        assert!(ActiveFilter::Inactive.keeps(false));
        assert!(ActiveFilter::All.keeps(true) && ActiveFilter::All.keeps(false));
    }
}
