//! `vit login` / `vit logout` / `vit whoami` - session management

use console::style;
use dialoguer::{theme::ColorfulTheme, Password};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::yes_no;
use crate::cli::GlobalOpts;
use crate::core::session::{self, Role};

use super::utils::AppContext;

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long, short = 'e')]
    pub email: String,

    /// Role to sign in as
    #[arg(long, short = 'r', value_enum, default_value = "sales")]
    pub role: Role,

    /// Password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct WhoamiArgs {
    /// Re-fetch the identity from the remote before printing
    #[arg(long)]
    pub refresh: bool,
}

pub fn run_login(args: LoginArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;

    let password = match args.password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()
            .into_diagnostic()?,
    };

    if args.email.trim().is_empty() || password.is_empty() {
        return Err(miette::miette!("email and password are required"));
    }

    let new_session = session::login(&ctx.gateway, &args.email, &password, args.role)?;
    ctx.session_store().save(&new_session).into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Signed in as {} ({})",
            style("✓").green(),
            style(&new_session.identity.name).cyan(),
            new_session.identity.role
        );
    }
    Ok(())
}

pub fn run_logout(global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    let store = ctx.session_store();

    if !store.exists() {
        if !global.quiet {
            println!("Not logged in.");
        }
        return Ok(());
    }

    store.clear();
    if !global.quiet {
        println!("{} Signed out, session cleared", style("✓").green());
    }
    Ok(())
}

pub fn run_whoami(args: WhoamiArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = AppContext::init(global)?;
    let current = ctx.require_session()?.clone();

    let session = if args.refresh {
        let refreshed = session::refresh(&ctx.gateway, &current)?;
        ctx.session_store().save(&refreshed).into_diagnostic()?;
        refreshed
    } else {
        current
    };

    let identity = &session.identity;
    println!("{}: {}", style("Name").bold(), identity.name);
    println!("{}: {}", style("Email").bold(), identity.email);
    println!("{}: {}", style("Role").bold(), identity.role);
    println!("{}: {}", style("Admin").bold(), yes_no(identity.is_admin()));
    println!(
        "{}: {}",
        style("Email verified").bold(),
        yes_no(identity.email_verified)
    );
    println!(
        "{}: {}",
        style("Onboarding complete").bold(),
        yes_no(identity.onboarding_completed)
    );
    Ok(())
}
