//! `vit config` - effective configuration

use clap::Subcommand;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::GlobalOpts;

use super::utils::AppContext;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print state file locations
    Path,
}

#[derive(Serialize)]
struct EffectiveConfig {
    base_url: String,
    default_format: Option<String>,
    demo_data: bool,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;

    match cmd {
        ConfigCommands::Show => {
            let effective = EffectiveConfig {
                base_url: ctx.config.base_url(global.base_url.as_deref()),
                default_format: ctx.config.default_format.clone(),
                demo_data: ctx.config.demo_data(),
            };
            print!(
                "{}",
                serde_yml::to_string(&effective).into_diagnostic()?
            );
        }
        ConfigCommands::Path => {
            println!("config:  {}", ctx.paths.config_file().display());
            println!("session: {}", ctx.paths.session_file().display());
            println!("cache:   {}", ctx.paths.cache_file().display());
        }
    }
    Ok(())
}
