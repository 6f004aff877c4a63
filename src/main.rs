use clap::Parser;
use console::style;
use miette::Result;
use vit::cli::{Cli, Commands};
use vit::core::{SessionStore, StatePaths};
use vit::remote::ApiError;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let outcome = match cli.command {
        Commands::Login(args) => vit::cli::commands::login::run_login(args, &global),
        Commands::Logout => vit::cli::commands::login::run_logout(&global),
        Commands::Whoami(args) => vit::cli::commands::login::run_whoami(args, &global),
        Commands::Project(cmd) => vit::cli::commands::project::run(cmd, &global),
        Commands::Category(cmd) => vit::cli::commands::category::run(cmd, &global),
        Commands::Wing(cmd) => vit::cli::commands::wing::run(cmd, &global),
        Commands::Unit(cmd) => vit::cli::commands::unit::run(cmd, &global),
        Commands::Status(args) => vit::cli::commands::status::run(args, &global),
        Commands::Cache(cmd) => vit::cli::commands::cache::run(cmd, &global),
        Commands::Config(cmd) => vit::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => vit::cli::commands::completions::run(args),
    };

    // A rejected credential is handled once, here: drop the stored session
    // so the next command starts clean, then point at login.
    if let Err(report) = &outcome {
        if matches!(report.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized)) {
            let paths = StatePaths::resolve(global.state_dir.as_deref());
            SessionStore::at(paths.session_file()).clear();
            eprintln!(
                "{} Session expired or invalid. Run {} to sign in again.",
                style("✗").red(),
                style("vit login").yellow()
            );
        }
    }

    outcome
}
