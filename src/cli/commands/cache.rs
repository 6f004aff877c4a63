//! `vit cache` - inspect and clear the query cache

use chrono::Utc;
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::truncate_str;
use crate::cli::table::render_table;
use crate::cli::GlobalOpts;
use crate::core::cache::QueryCache;

use super::utils::AppContext;

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cached queries and their freshness
    Info,

    /// Drop every cached query
    Clear,
}

pub fn run(cmd: CacheCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CacheCommands::Info => run_info(global),
        CacheCommands::Clear => run_clear(global),
    }
}

fn run_info(global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    let cache_file = ctx.paths.cache_file();

    if !cache_file.exists() {
        println!("Cache is empty.");
        return Ok(());
    }

    let cache = QueryCache::open(&cache_file)?;
    let entries = cache.entries()?;
    if entries.is_empty() {
        println!("Cache is empty.");
        return Ok(());
    }

    let now = Utc::now();
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            let age = (now - e.fetched_at).num_seconds().max(0);
            vec![
                e.key.clone(),
                e.records
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "?".to_string()),
                format!("{}s", age),
                if e.stale { "stale" } else { "fresh" }.to_string(),
                truncate_str(&e.digest, 12),
            ]
        })
        .collect();

    println!(
        "{}",
        render_table(&["key", "records", "age", "state", "digest"], &rows)
    );
    if !global.quiet {
        println!("{}", style(cache_file.display()).dim());
    }
    Ok(())
}

fn run_clear(global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    let cache_file = ctx.paths.cache_file();

    if cache_file.exists() {
        let mut cache = QueryCache::open(&cache_file)?;
        cache.clear()?;
    }

    if !global.quiet {
        println!("{} Cache cleared", style("✓").green());
    }
    Ok(())
}
