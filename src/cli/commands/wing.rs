//! `vit wing` - wings within a project

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::table::ListView;
use crate::cli::{forms, GlobalOpts};
use crate::core::cache::Mutation;
use crate::core::sample;
use crate::entities::Wing;

use super::utils::{emit_record, AppContext};

#[derive(Subcommand, Debug)]
pub enum WingCommands {
    /// List a project's wings
    List(ListArgs),

    /// Show a wing's details
    Show(RefArgs),

    /// Add a wing to a project
    New(NewArgs),

    /// Edit a wing
    Edit(EditArgs),

    /// Delete a wing and all of its units (asks for confirmation)
    Delete(RefArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Project id or name
    #[arg(long, short = 'p')]
    pub project: String,

    /// Bypass the cache and refetch
    #[arg(long)]
    pub refresh: bool,
}

#[derive(clap::Args, Debug)]
pub struct RefArgs {
    /// Project id or name
    #[arg(long, short = 'p')]
    pub project: String,

    /// Wing id or name
    pub wing: String,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Project id or name
    #[arg(long, short = 'p')]
    pub project: String,

    pub name: String,

    /// Number of floors
    #[arg(long)]
    pub floors: u32,

    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Project id or name
    #[arg(long, short = 'p')]
    pub project: String,

    /// Wing id or name
    pub wing: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub floors: Option<u32>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Set the active flag
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WingDraft {
    name: String,
    total_floors: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "isActive")]
    active: bool,
    project_id: String,
}

pub fn run(cmd: WingCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        WingCommands::List(args) => run_list(args, global),
        WingCommands::Show(args) => run_show(args, global),
        WingCommands::New(args) => run_new(args, global),
        WingCommands::Edit(args) => run_edit(args, global),
        WingCommands::Delete(args) => run_delete(args, global),
    }
}

/// Fetch a project's wings, substituting the demo set when the remote
/// answered with a legitimately empty list and demo data is on.
fn wings_or_sample(
    store: &mut crate::core::InventoryStore<'_>,
    project_id: &str,
    refresh: bool,
    demo_enabled: bool,
    quiet: bool,
) -> Result<Vec<Wing>> {
    let wings = store.wings(project_id, refresh)?;
    if sample::should_fall_back(&wings, demo_enabled) {
        if !quiet {
            eprintln!(
                "{}",
                style("note: no wings on the server; showing demo data").dim()
            );
        }
        return Ok(sample::wings(project_id));
    }
    Ok(wings)
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let project = store.find_project(&args.project)?;
    let wings = wings_or_sample(
        &mut store,
        &project.id,
        args.refresh,
        ctx.config.demo_data(),
        global.quiet,
    )?;

    let rows: Vec<Vec<String>> = wings
        .iter()
        .map(|w| {
            vec![
                w.id.clone(),
                w.name.clone(),
                w.total_floors.to_string(),
                w.description.clone().unwrap_or_else(|| "-".to_string()),
                crate::cli::helpers::yes_no(w.active).to_string(),
            ]
        })
        .collect();

    ListView {
        items: &wings,
        headers: &["id", "name", "floors", "description", "active"],
        rows,
        ids: wings.iter().map(|w| w.id.clone()).collect(),
        noun: "wing(s)",
    }
    .emit(ctx.format(global), global.quiet)
}

fn run_show(args: RefArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let project = store.find_project(&args.project)?;
    let wing = store.find_wing(&project.id, &args.wing)?;
    emit_record(&wing, ctx.format(global))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let project = store.find_project(&args.project)?;
    let draft = WingDraft {
        name: args.name,
        total_floors: args.floors,
        description: args.description,
        active: true,
        project_id: project.id.clone(),
    };

    store.create(
        &format!("projects/{}/wings", project.id),
        &draft,
        Mutation::Wing {
            project_id: project.id.clone(),
        },
    )?;

    if !global.quiet {
        println!(
            "{} Created wing {} in {}",
            style("✓").green(),
            style(&draft.name).cyan(),
            style(&project.name).cyan()
        );
    }
    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let project = store.find_project(&args.project)?;
    let current = store.find_wing(&project.id, &args.wing)?;

    let draft = WingDraft {
        name: args.name.unwrap_or_else(|| current.name.clone()),
        total_floors: args.floors.unwrap_or(current.total_floors),
        description: args.description.or_else(|| current.description.clone()),
        active: args.active.unwrap_or(current.active),
        project_id: project.id.clone(),
    };

    store.update(
        &format!("projects/{}/wings/{}", project.id, current.id),
        &draft,
        Mutation::Wing {
            project_id: project.id.clone(),
        },
    )?;

    if !global.quiet {
        println!(
            "{} Updated wing {}",
            style("✓").green(),
            style(&draft.name).cyan()
        );
    }
    Ok(())
}

fn run_delete(args: RefArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let project = store.find_project(&args.project)?;
    let wing = store.find_wing(&project.id, &args.wing)?;

    // Deleting a wing cascades server-side; make that explicit.
    let confirmed = forms::confirm_destructive(
        &format!("Delete wing '{}' and ALL of its units?", wing.name),
        global.yes,
    )?;
    if !confirmed {
        println!("Aborted; nothing deleted.");
        return Ok(());
    }

    store.remove(
        &format!("projects/{}/wings/{}", project.id, wing.id),
        Mutation::WingDelete {
            project_id: project.id.clone(),
            wing_id: wing.id.clone(),
        },
    )?;

    if !global.quiet {
        println!(
            "{} Deleted wing {}",
            style("✓").green(),
            style(&wing.name).cyan()
        );
    }
    Ok(())
}
