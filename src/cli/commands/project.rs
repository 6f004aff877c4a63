//! `vit project` - project management

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::args::ActiveFilter;
use crate::cli::helpers::{truncate_str, yes_no};
use crate::cli::table::ListView;
use crate::cli::{forms, GlobalOpts};
use crate::core::cache::Mutation;
use crate::entities::category::validate_subcategory;

use super::utils::{emit_record, AppContext};

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects with search and filtering
    List(ListArgs),

    /// Show a project's details
    Show(ShowArgs),

    /// Create a new project
    New(NewArgs),

    /// Edit an existing project
    Edit(EditArgs),

    /// Invert a project's active flag
    Toggle(RefArgs),

    /// Delete a project (asks for confirmation)
    Delete(RefArgs),

    /// Export the full project list to a dated file
    Export(ExportArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum SortColumn {
    #[default]
    Name,
    Developer,
    Completion,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Substring search over name, developer, and RERA number
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Filter by active flag
    #[arg(long, value_enum, default_value = "all")]
    pub status: ActiveFilter,

    /// Sort by field
    #[arg(long, value_enum, default_value = "name")]
    pub sort: SortColumn,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Limit output to N items
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show count only
    #[arg(long)]
    pub count: bool,

    /// Bypass the cache and refetch
    #[arg(long)]
    pub refresh: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Project id or name
    pub project: String,
}

#[derive(clap::Args, Debug)]
pub struct RefArgs {
    /// Project id or name
    pub project: String,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Category id or name
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Subcategory id or name (must belong to the category)
    #[arg(long)]
    pub subcategory: Option<String>,

    #[arg(long)]
    pub developer: Option<String>,

    /// RERA registration number
    #[arg(long)]
    pub rera: Option<String>,

    /// Completion date (YYYY-MM-DD)
    #[arg(long)]
    pub completion: Option<String>,

    /// Fill in fields interactively
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Project id or name
    pub project: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long, short = 'c')]
    pub category: Option<String>,

    #[arg(long)]
    pub subcategory: Option<String>,

    #[arg(long)]
    pub developer: Option<String>,

    #[arg(long)]
    pub rera: Option<String>,

    #[arg(long)]
    pub completion: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Output directory (default: current directory)
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    /// Export CSV instead of JSON
    #[arg(long)]
    pub csv: bool,
}

/// Wire shape for project create/update bodies
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDraft {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_category_id: Option<String>,
    developer: String,
    rera_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    completion_date: Option<NaiveDate>,
    #[serde(rename = "isActive")]
    active: bool,
}

pub fn run(cmd: ProjectCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProjectCommands::List(args) => run_list(args, global),
        ProjectCommands::Show(args) => run_show(args, global),
        ProjectCommands::New(args) => run_new(args, global),
        ProjectCommands::Edit(args) => run_edit(args, global),
        ProjectCommands::Toggle(args) => run_toggle(args, global),
        ProjectCommands::Delete(args) => run_delete(args, global),
        ProjectCommands::Export(args) => run_export(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let mut projects = store.projects(args.refresh)?;

    if let Some(ref query) = args.search {
        projects.retain(|p| p.matches_search(query));
    }
    projects.retain(|p| args.status.keeps(p.active));

    match args.sort {
        SortColumn::Name => projects.sort_by(|a, b| a.name.cmp(&b.name)),
        SortColumn::Developer => projects.sort_by(|a, b| a.developer.cmp(&b.developer)),
        SortColumn::Completion => {
            projects.sort_by(|a, b| a.completion_date.cmp(&b.completion_date))
        }
    }
    if args.reverse {
        projects.reverse();
    }
    if let Some(limit) = args.limit {
        projects.truncate(limit);
    }

    if args.count {
        println!("{}", projects.len());
        return Ok(());
    }

    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                truncate_str(&p.name, 32),
                truncate_str(&p.developer, 24),
                p.rera_number.clone(),
                p.completion_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                yes_no(p.active).to_string(),
            ]
        })
        .collect();

    ListView {
        items: &projects,
        headers: &["id", "name", "developer", "rera", "completion", "active"],
        rows,
        ids: projects.iter().map(|p| p.id.clone()).collect(),
        noun: "project(s)",
    }
    .emit(ctx.format(global), global.quiet)
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let project = store.find_project(&args.project)?;
    emit_record(&project, ctx.format(global))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let draft = if args.interactive {
        let categories = store.categories(false)?;
        let subcategories = store.subcategories(false)?;
        let (category, subcategory) = forms::select_category_pair(&categories, &subcategories)?;

        ProjectDraft {
            name: forms::prompt_required("Project name")?,
            description: forms::prompt_optional("Description", None)?,
            category_id: Some(category.id.clone()),
            sub_category_id: subcategory.map(|s| s.id.clone()),
            developer: forms::prompt_required("Developer")?,
            rera_number: forms::prompt_required("RERA number")?,
            completion_date: forms::prompt_optional("Completion date (YYYY-MM-DD)", None)?
                .map(|s| parse_date(&s))
                .transpose()?,
            active: true,
        }
    } else {
        let name = args
            .name
            .ok_or_else(|| miette::miette!("--name is required (or use --interactive)"))?;
        let developer = args
            .developer
            .ok_or_else(|| miette::miette!("--developer is required (or use --interactive)"))?;
        let rera = args
            .rera
            .ok_or_else(|| miette::miette!("--rera is required (or use --interactive)"))?;

        let (category_id, sub_category_id) =
            resolve_category_refs(&mut store, args.category.as_deref(), args.subcategory.as_deref())?;

        ProjectDraft {
            name,
            description: args.description,
            category_id,
            sub_category_id,
            developer,
            rera_number: rera,
            completion_date: args.completion.as_deref().map(parse_date).transpose()?,
            active: true,
        }
    };

    store.create("projects", &draft, Mutation::Project)?;

    if !global.quiet {
        println!(
            "{} Created project {}",
            style("✓").green(),
            style(&draft.name).cyan()
        );
    }
    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let current = store.find_project(&args.project)?;

    let (category_id, sub_category_id) = if args.category.is_some() || args.subcategory.is_some() {
        // A new category without a subcategory drops the old subcategory:
        // it may not belong to the new parent.
        resolve_category_refs(&mut store, args.category.as_deref(), args.subcategory.as_deref())?
    } else {
        (current.category_id.clone(), current.sub_category_id.clone())
    };

    let draft = ProjectDraft {
        name: args.name.unwrap_or_else(|| current.name.clone()),
        description: args.description.or_else(|| current.description.clone()),
        category_id,
        sub_category_id,
        developer: args.developer.unwrap_or_else(|| current.developer.clone()),
        rera_number: args.rera.unwrap_or_else(|| current.rera_number.clone()),
        completion_date: match args.completion.as_deref() {
            Some(s) => Some(parse_date(s)?),
            None => current.completion_date,
        },
        active: current.active,
    };

    store.update(&format!("projects/{}", current.id), &draft, Mutation::Project)?;

    if !global.quiet {
        println!(
            "{} Updated project {}",
            style("✓").green(),
            style(&draft.name).cyan()
        );
    }
    Ok(())
}

fn run_toggle(args: RefArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let project = store.find_project(&args.project)?;
    let toggled = project.toggled();

    // The shortcut re-submits the full record with the flag inverted.
    store.update(
        &format!("projects/{}", toggled.id),
        &toggled,
        Mutation::Project,
    )?;

    if !global.quiet {
        println!(
            "{} Project {} is now {}",
            style("✓").green(),
            style(&toggled.name).cyan(),
            if toggled.active { "active" } else { "inactive" }
        );
    }
    Ok(())
}

fn run_delete(args: RefArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let project = store.find_project(&args.project)?;

    let confirmed = forms::confirm_destructive(
        &format!("Delete project '{}'? This cannot be undone.", project.name),
        global.yes,
    )?;
    if !confirmed {
        println!("Aborted; nothing deleted.");
        return Ok(());
    }

    store.remove(
        &format!("projects/{}", project.id),
        Mutation::ProjectDelete {
            project_id: project.id.clone(),
        },
    )?;

    if !global.quiet {
        println!(
            "{} Deleted project {}",
            style("✓").green(),
            style(&project.name).cyan()
        );
    }
    Ok(())
}

fn run_export(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    // The export covers the full loaded list, never a filtered view.
    let projects = store.projects(false)?;

    let date = chrono::Local::now().format("%Y-%m-%d");
    let extension = if args.csv { "csv" } else { "json" };
    let filename = format!("projects-{}.{}", date, extension);
    let path = args.out.unwrap_or_default().join(filename);

    if args.csv {
        let mut writer = csv::Writer::from_path(&path).into_diagnostic()?;
        writer
            .write_record([
                "id",
                "name",
                "developer",
                "rera_number",
                "completion_date",
                "active",
            ])
            .into_diagnostic()?;
        for p in &projects {
            writer
                .write_record([
                    p.id.as_str(),
                    p.name.as_str(),
                    p.developer.as_str(),
                    p.rera_number.as_str(),
                    &p.completion_date
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    yes_no(p.active),
                ])
                .into_diagnostic()?;
        }
        writer.flush().into_diagnostic()?;
    } else {
        let json = serde_json::to_string_pretty(&projects).into_diagnostic()?;
        std::fs::write(&path, json).into_diagnostic()?;
    }

    println!(
        "{} Exported {} project(s) to {}",
        style("✓").green(),
        projects.len(),
        style(path.display()).cyan()
    );
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| miette::miette!("invalid date '{}'; expected YYYY-MM-DD", s))
}

/// Resolve category/subcategory flags to ids, enforcing the parent
/// constraint. A subcategory without a category is rejected outright.
fn resolve_category_refs(
    store: &mut crate::core::InventoryStore<'_>,
    category: Option<&str>,
    subcategory: Option<&str>,
) -> Result<(Option<String>, Option<String>)> {
    let Some(category_query) = category else {
        if subcategory.is_some() {
            return Err(miette::miette!(
                "--subcategory requires --category to be set"
            ));
        }
        return Ok((None, None));
    };

    let category = store.find_category(category_query)?;

    let sub_category_id = match subcategory {
        None => None,
        Some(sub_query) => {
            let sub = store.find_subcategory(sub_query)?;
            let all_subs = store.subcategories(false)?;
            validate_subcategory(&all_subs, &category.id, &sub.id).map_err(|valid| {
                if valid.is_empty() {
                    miette::miette!(
                        "'{}' does not belong to category '{}', which has no subcategories",
                        sub.name,
                        category.name
                    )
                } else {
                    miette::miette!(
                        "'{}' does not belong to category '{}'; valid subcategories: {}",
                        sub.name,
                        category.name,
                        valid.join(", ")
                    )
                }
            })?;
            Some(sub.id)
        }
    };

    Ok((Some(category.id), sub_category_id))
}
