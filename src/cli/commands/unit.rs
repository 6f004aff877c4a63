//! `vit unit` - units within a wing, grouped by floor

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{format_area, format_price};
use crate::cli::table::ListView;
use crate::cli::{forms, GlobalOpts, OutputFormat};
use crate::core::cache::Mutation;
use crate::core::{sample, InventoryStore};
use crate::entities::unit::group_by_floor;
use crate::entities::{Unit, UnitStatus, UnitType, Wing};

use super::utils::{emit_record, AppContext};

#[derive(Subcommand, Debug)]
pub enum UnitCommands {
    /// List a wing's units, grouped by floor
    List(ListArgs),

    /// Show a unit's details
    Show(RefArgs),

    /// Add a unit to a wing
    New(NewArgs),

    /// Edit a unit
    Edit(EditArgs),

    /// Put a unit on hold for a prospect
    Hold(HoldArgs),

    /// Mark a unit as sold
    Sell(SellArgs),

    /// Return a held or sold unit to the open market
    Release(RefArgs),

    /// Delete a unit (asks for confirmation)
    Delete(RefArgs),
}

#[derive(clap::Args, Debug)]
pub struct ScopeArgs {
    /// Project id or name
    #[arg(long, short = 'p')]
    pub project: String,

    /// Wing id or name
    #[arg(long, short = 'w')]
    pub wing: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Substring search over unit name and facing
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only units in this status
    #[arg(long, value_enum)]
    pub status: Option<UnitStatus>,

    /// Bypass the cache and refetch
    #[arg(long)]
    pub refresh: bool,
}

#[derive(clap::Args, Debug)]
pub struct RefArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Unit id or name
    pub unit: String,
}

#[derive(clap::Args, Debug)]
pub struct HoldArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Unit id or name
    pub unit: String,

    /// Name of the prospect holding the unit
    #[arg(long)]
    pub by: String,
}

#[derive(clap::Args, Debug)]
pub struct SellArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Unit id or name
    pub unit: String,

    /// Buyer or selling agent
    #[arg(long)]
    pub to: String,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Unit number or name, e.g. "A-1204"
    pub name: String,

    #[arg(long = "type", short = 't', value_enum)]
    pub unit_type: UnitType,

    /// Floor label, e.g. "12" or "G"
    #[arg(long)]
    pub floor: String,

    /// Carpet area in sq.ft
    #[arg(long)]
    pub carpet: f64,

    /// Saleable area in sq.ft
    #[arg(long)]
    pub saleable: f64,

    /// Facing direction
    #[arg(long)]
    pub facing: Option<String>,

    #[arg(long)]
    pub price: f64,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Unit id or name
    pub unit: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long = "type", short = 't', value_enum)]
    pub unit_type: Option<UnitType>,

    #[arg(long)]
    pub floor: Option<String>,

    #[arg(long)]
    pub carpet: Option<f64>,

    #[arg(long)]
    pub saleable: Option<f64>,

    #[arg(long)]
    pub facing: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UnitDraft {
    name: String,
    #[serde(rename = "type")]
    unit_type: UnitType,
    floor: String,
    carpet_area: f64,
    saleable_area: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    facing: Option<String>,
    price: f64,
    status: UnitStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    held_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sold_by: Option<String>,
    #[serde(rename = "isActive")]
    active: bool,
    wing_id: String,
}

impl From<Unit> for UnitDraft {
    fn from(u: Unit) -> Self {
        Self {
            name: u.name,
            unit_type: u.unit_type,
            floor: u.floor,
            carpet_area: u.carpet_area,
            saleable_area: u.saleable_area,
            facing: u.facing,
            price: u.price,
            status: u.status,
            held_by: u.held_by,
            sold_by: u.sold_by,
            active: u.active,
            wing_id: u.wing_id,
        }
    }
}

pub fn run(cmd: UnitCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        UnitCommands::List(args) => run_list(args, global),
        UnitCommands::Show(args) => run_show(args, global),
        UnitCommands::New(args) => run_new(args, global),
        UnitCommands::Edit(args) => run_edit(args, global),
        UnitCommands::Hold(args) => run_hold(args, global),
        UnitCommands::Sell(args) => run_sell(args, global),
        UnitCommands::Release(args) => run_release(args, global),
        UnitCommands::Delete(args) => run_delete(args, global),
    }
}

fn resolve_scope(store: &mut InventoryStore<'_>, scope: &ScopeArgs) -> Result<Wing> {
    let project = store.find_project(&scope.project)?;
    store.find_wing(&project.id, &scope.wing)
}

/// Fetch a wing's units, substituting the demo set when the remote answered
/// with a legitimately empty list and demo data is on.
fn units_or_sample(
    store: &mut InventoryStore<'_>,
    wing_id: &str,
    refresh: bool,
    demo_enabled: bool,
    quiet: bool,
) -> Result<Vec<Unit>> {
    let units = store.units(wing_id, refresh)?;
    if sample::should_fall_back(&units, demo_enabled) {
        if !quiet {
            eprintln!(
                "{}",
                style("note: no units on the server; showing demo data").dim()
            );
        }
        return Ok(sample::units(wing_id));
    }
    Ok(units)
}

fn styled_status(status: UnitStatus) -> String {
    match status {
        UnitStatus::Available => style("available").green().to_string(),
        UnitStatus::Hold => style("hold").yellow().to_string(),
        UnitStatus::Sold => style("sold").red().to_string(),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let wing = resolve_scope(&mut store, &args.scope)?;
    let mut units = units_or_sample(
        &mut store,
        &wing.id,
        args.refresh,
        ctx.config.demo_data(),
        global.quiet,
    )?;

    if let Some(ref query) = args.search {
        units.retain(|u| u.matches_search(query));
    }
    if let Some(status) = args.status {
        units.retain(|u| u.status == status);
    }

    let format = ctx.format(global);
    match format {
        OutputFormat::Auto | OutputFormat::Table => {
            print_grouped(&wing, &units, global.quiet);
            Ok(())
        }
        _ => {
            let rows: Vec<Vec<String>> = units
                .iter()
                .map(|u| {
                    vec![
                        u.id.clone(),
                        u.name.clone(),
                        u.unit_type.to_string(),
                        u.floor.clone(),
                        format!("{:.0}", u.carpet_area),
                        format!("{:.0}", u.saleable_area),
                        format!("{:.0}", u.price),
                        u.status.to_string(),
                    ]
                })
                .collect();

            ListView {
                items: &units,
                headers: &[
                    "id", "name", "type", "floor", "carpet", "saleable", "price", "status",
                ],
                rows,
                ids: units.iter().map(|u| u.id.clone()).collect(),
                noun: "unit(s)",
            }
            .emit(format, global.quiet)
        }
    }
}

/// The default view: floors top-down, one line per unit, status colored
fn print_grouped(wing: &Wing, units: &[Unit], quiet: bool) {
    if units.is_empty() {
        if !quiet {
            println!("No unit(s) found.");
        }
        return;
    }

    if !quiet {
        println!(
            "{} ({} floors)",
            style(&wing.name).bold(),
            wing.total_floors
        );
    }

    for (floor, members) in group_by_floor(units) {
        println!("{}", style(format!("Floor {}", floor)).bold().underlined());
        for unit in members {
            let party = match unit.status {
                UnitStatus::Hold => unit
                    .held_by
                    .as_deref()
                    .map(|p| format!(" (held by {})", p))
                    .unwrap_or_default(),
                UnitStatus::Sold => unit
                    .sold_by
                    .as_deref()
                    .map(|p| format!(" (sold by {})", p))
                    .unwrap_or_default(),
                UnitStatus::Available => String::new(),
            };
            println!(
                "  {:<10} {:<10} {:>12} {:>14}  {}{}",
                style(&unit.name).cyan(),
                unit.unit_type.to_string(),
                format_area(unit.carpet_area),
                format_price(unit.price),
                styled_status(unit.status),
                party
            );
        }
    }

    if !quiet {
        let available = units
            .iter()
            .filter(|u| u.status == UnitStatus::Available)
            .count();
        println!(
            "\n{} unit(s), {} available",
            style(units.len()).cyan(),
            style(available).green()
        );
    }
}

fn run_show(args: RefArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let wing = resolve_scope(&mut store, &args.scope)?;
    let unit = store.find_unit(&wing.id, &args.unit)?;
    emit_record(&unit, ctx.format(global))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let wing = resolve_scope(&mut store, &args.scope)?;
    let draft = UnitDraft {
        name: args.name,
        unit_type: args.unit_type,
        floor: args.floor,
        carpet_area: args.carpet,
        saleable_area: args.saleable,
        facing: args.facing,
        price: args.price,
        status: UnitStatus::Available,
        held_by: None,
        sold_by: None,
        active: true,
        wing_id: wing.id.clone(),
    };

    store.create(
        &format!("wings/{}/units", wing.id),
        &draft,
        Mutation::Unit {
            wing_id: wing.id.clone(),
        },
    )?;

    if !global.quiet {
        println!(
            "{} Created unit {} in {}",
            style("✓").green(),
            style(&draft.name).cyan(),
            style(&wing.name).cyan()
        );
    }
    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let wing = resolve_scope(&mut store, &args.scope)?;
    let current = store.find_unit(&wing.id, &args.unit)?;

    let unit_id = current.id.clone();
    let mut draft = UnitDraft::from(current);
    if let Some(name) = args.name {
        draft.name = name;
    }
    if let Some(unit_type) = args.unit_type {
        draft.unit_type = unit_type;
    }
    if let Some(floor) = args.floor {
        draft.floor = floor;
    }
    if let Some(carpet) = args.carpet {
        draft.carpet_area = carpet;
    }
    if let Some(saleable) = args.saleable {
        draft.saleable_area = saleable;
    }
    if let Some(facing) = args.facing {
        draft.facing = Some(facing);
    }
    if let Some(price) = args.price {
        draft.price = price;
    }

    store.update(
        &format!("wings/{}/units/{}", wing.id, unit_id),
        &draft,
        Mutation::Unit {
            wing_id: wing.id.clone(),
        },
    )?;

    if !global.quiet {
        println!(
            "{} Updated unit {}",
            style("✓").green(),
            style(&draft.name).cyan()
        );
    }
    Ok(())
}

fn transition(
    scope: &ScopeArgs,
    unit_query: &str,
    global: &GlobalOpts,
    apply: impl Fn(&Unit) -> Unit,
    verb: &str,
) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let wing = resolve_scope(&mut store, scope)?;
    let unit = store.find_unit(&wing.id, unit_query)?;
    let next = apply(&unit);

    store.update(
        &format!("wings/{}/units/{}", wing.id, next.id),
        &UnitDraft::from(next.clone()),
        Mutation::Unit {
            wing_id: wing.id.clone(),
        },
    )?;

    if !global.quiet {
        println!(
            "{} Unit {} {} ({})",
            style("✓").green(),
            style(&next.name).cyan(),
            verb,
            styled_status(next.status)
        );
    }
    Ok(())
}

fn run_hold(args: HoldArgs, global: &GlobalOpts) -> Result<()> {
    transition(
        &args.scope,
        &args.unit,
        global,
        |u| u.hold(&args.by),
        "placed on hold",
    )
}

fn run_sell(args: SellArgs, global: &GlobalOpts) -> Result<()> {
    transition(
        &args.scope,
        &args.unit,
        global,
        |u| u.sell(&args.to),
        "marked sold",
    )
}

fn run_release(args: RefArgs, global: &GlobalOpts) -> Result<()> {
    transition(
        &args.scope,
        &args.unit,
        global,
        |u| u.release(),
        "back on the market",
    )
}

fn run_delete(args: RefArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    ctx.require_session()?;
    let mut store = ctx.store()?;

    let wing = resolve_scope(&mut store, &args.scope)?;
    let unit = store.find_unit(&wing.id, &args.unit)?;

    if !forms::confirm_destructive(
        &format!("Delete unit '{}'?", unit.name),
        global.yes,
    )? {
        println!("Aborted; nothing deleted.");
        return Ok(());
    }

    store.remove(
        &format!("wings/{}/units/{}", wing.id, unit.id),
        Mutation::Unit {
            wing_id: wing.id.clone(),
        },
    )?;

    if !global.quiet {
        println!(
            "{} Deleted unit {}",
            style("✓").green(),
            style(&unit.name).cyan()
        );
    }
    Ok(())
}
