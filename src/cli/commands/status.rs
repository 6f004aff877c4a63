//! `vit status` - local state at a glance, no network

use chrono::Utc;
use console::style;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::cache::QueryCache;
use crate::core::menu;

use super::utils::AppContext;

#[derive(clap::Args, Debug)]
pub struct StatusArgs {}

pub fn run(_args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;

    println!("{}", style("Vantage Inventory Toolkit").bold());
    println!("  Server:    {}", ctx.config.base_url(global.base_url.as_deref()));
    println!("  State dir: {}", ctx.paths.dir().display());
    println!(
        "  Demo data: {}",
        if ctx.config.demo_data() { "on" } else { "off" }
    );
    println!();

    match &ctx.session {
        Some(session) => {
            let who = &session.identity;
            println!(
                "  Signed in as {} <{}> ({})",
                style(&who.name).cyan(),
                who.email,
                who.role
            );
            println!();
            println!("{}", style("Available sections").bold());
            for entry in menu::visible_for(who.role) {
                println!("  {:<16} {}", entry.label, style(entry.command).dim());
            }
        }
        None => {
            println!(
                "  Not logged in. Run {} to sign in.",
                style("vit login").yellow()
            );
        }
    }

    println!();
    print_cache_summary(&ctx)?;
    Ok(())
}

fn print_cache_summary(ctx: &AppContext) -> Result<()> {
    let cache_file = ctx.paths.cache_file();
    if !cache_file.exists() {
        println!("{}", style("Cache: empty").dim());
        return Ok(());
    }

    let cache = QueryCache::open(&cache_file)?;
    let entries = cache.entries()?;
    if entries.is_empty() {
        println!("{}", style("Cache: empty").dim());
        return Ok(());
    }

    let now = Utc::now();
    println!("{}", style("Cache").bold());
    for entry in entries {
        let age = (now - entry.fetched_at).num_seconds().max(0);
        let state = if entry.stale {
            style("stale").yellow().to_string()
        } else {
            style("fresh").green().to_string()
        };
        let records = entry
            .records
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "  {:<16} {:>4} record(s), {:>4}s old, {}",
            entry.key, records, age, state
        );
    }
    Ok(())
}
