//! `vit category` - categories and their subcategories

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::table::ListView;
use crate::cli::{forms, GlobalOpts};
use crate::core::cache::Mutation;
use crate::entities::category::allowed_subcategories;

use super::utils::AppContext;

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories
    List(ListArgs),

    /// Create a category
    New(NewArgs),

    /// Rename a category
    Edit(EditArgs),

    /// Delete a category (asks for confirmation)
    Delete(RefArgs),

    /// Manage subcategories
    #[command(subcommand)]
    Sub(SubCommands),
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    /// List subcategories, optionally scoped to one category
    List(SubListArgs),

    /// Create a subcategory under a category
    New(SubNewArgs),

    /// Rename a subcategory
    Edit(EditArgs),

    /// Delete a subcategory (asks for confirmation)
    Delete(RefArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Bypass the cache and refetch
    #[arg(long)]
    pub refresh: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Id or current name
    pub reference: String,

    /// New name
    #[arg(long)]
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct RefArgs {
    /// Id or name
    pub reference: String,
}

#[derive(clap::Args, Debug)]
pub struct SubListArgs {
    /// Restrict to one category (id or name)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Bypass the cache and refetch
    #[arg(long)]
    pub refresh: bool,
}

#[derive(clap::Args, Debug)]
pub struct SubNewArgs {
    pub name: String,

    /// Parent category (id or name)
    #[arg(long, short = 'c')]
    pub category: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryDraft {
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubCategoryDraft {
    name: String,
    category_id: String,
}

pub fn run(cmd: CategoryCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CategoryCommands::List(args) => run_list(args, global),
        CategoryCommands::New(args) => run_new(args, global),
        CategoryCommands::Edit(args) => run_edit(args, global),
        CategoryCommands::Delete(args) => run_delete(args, global),
        CategoryCommands::Sub(sub) => match sub {
            SubCommands::List(args) => run_sub_list(args, global),
            SubCommands::New(args) => run_sub_new(args, global),
            SubCommands::Edit(args) => run_sub_edit(args, global),
            SubCommands::Delete(args) => run_sub_delete(args, global),
        },
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let categories = store.categories(args.refresh)?;
    let subcategories = store.subcategories(args.refresh)?;

    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|c| {
            let subs = allowed_subcategories(&subcategories, &c.id);
            let sub_names: Vec<&str> = subs.iter().map(|s| s.name.as_str()).collect();
            vec![c.id.clone(), c.name.clone(), sub_names.join(", ")]
        })
        .collect();

    ListView {
        items: &categories,
        headers: &["id", "name", "subcategories"],
        rows,
        ids: categories.iter().map(|c| c.id.clone()).collect(),
        noun: "category(ies)",
    }
    .emit(ctx.format(global), global.quiet)
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let draft = CategoryDraft { name: args.name };
    store.create("categories", &draft, Mutation::Category)?;

    if !global.quiet {
        println!(
            "{} Created category {}",
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

    let category = store.find_category(&args.reference)?;
    let draft = CategoryDraft { name: args.name };
    store.update(
        &format!("categories/{}", category.id),
        &draft,
        Mutation::Category,
    )?;

    if !global.quiet {
        println!(
            "{} Renamed category {} to {}",
            style("✓").green(),
            style(&category.name).dim(),
            style(&draft.name).cyan()
        );
    }
    Ok(())
}

fn run_delete(args: RefArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let category = store.find_category(&args.reference)?;
    let subcategories = store.subcategories(false)?;
    let attached = allowed_subcategories(&subcategories, &category.id).len();

    let prompt = if attached > 0 {
        format!(
            "Delete category '{}'? {} subcategory(ies) reference it.",
            category.name, attached
        )
    } else {
        format!("Delete category '{}'?", category.name)
    };

    if !forms::confirm_destructive(&prompt, global.yes)? {
        println!("Aborted; nothing deleted.");
        return Ok(());
    }

    store.remove(&format!("categories/{}", category.id), Mutation::Category)?;

    if !global.quiet {
        println!(
            "{} Deleted category {}",
            style("✓").green(),
            style(&category.name).cyan()
        );
    }
    Ok(())
}

fn run_sub_list(args: SubListArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let categories = store.categories(args.refresh)?;
    let mut subcategories = store.subcategories(args.refresh)?;

    if let Some(ref query) = args.category {
        let category = store.find_category(query)?;
        subcategories.retain(|s| s.category_id == category.id);
    }

    let category_name = |id: &str| {
        categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    let rows: Vec<Vec<String>> = subcategories
        .iter()
        .map(|s| vec![s.id.clone(), s.name.clone(), category_name(&s.category_id)])
        .collect();

    ListView {
        items: &subcategories,
        headers: &["id", "name", "category"],
        rows,
        ids: subcategories.iter().map(|s| s.id.clone()).collect(),
        noun: "subcategory(ies)",
    }
    .emit(ctx.format(global), global.quiet)
}

fn run_sub_new(args: SubNewArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let category = store.find_category(&args.category)?;
    let draft = SubCategoryDraft {
        name: args.name,
        category_id: category.id.clone(),
    };
    store.create("subcategories", &draft, Mutation::SubCategory)?;

    if !global.quiet {
        println!(
            "{} Created subcategory {} under {}",
            style("✓").green(),
            style(&draft.name).cyan(),
            style(&category.name).cyan()
        );
    }
    Ok(())
}

fn run_sub_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let sub = store.find_subcategory(&args.reference)?;
    let draft = SubCategoryDraft {
        name: args.name,
        category_id: sub.category_id.clone(),
    };
    store.update(
        &format!("subcategories/{}", sub.id),
        &draft,
        Mutation::SubCategory,
    )?;

    if !global.quiet {
        println!(
            "{} Renamed subcategory {} to {}",
            style("✓").green(),
            style(&sub.name).dim(),
            style(&draft.name).cyan()
        );
    }
    Ok(())
}

fn run_sub_delete(args: RefArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let sub = store.find_subcategory(&args.reference)?;

    if !forms::confirm_destructive(
        &format!("Delete subcategory '{}'?", sub.name),
        global.yes,
    )? {
        println!("Aborted; nothing deleted.");
        return Ok(());
    }

    store.remove(
        &format!("subcategories/{}", sub.id),
        Mutation::SubCategory,
    )?;

    if !global.quiet {
        println!(
            "{} Deleted subcategory {}",
            style("✓").green(),
            style(&sub.name).cyan()
        );
    }
    Ok(())
}
