//! Shared command context
//!
//! Commands resolve state paths, load config and session, and build the
//! gateway once, here. The credential travels from the session into the
//! store; nothing installs it globally.

use console::style;
use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::cache::QueryCache;
use crate::core::{Config, InventoryStore, Session, SessionStore, StatePaths};
use crate::remote::HttpGateway;

pub struct AppContext {
    pub paths: StatePaths,
    pub config: Config,
    pub gateway: HttpGateway,
    pub session: Option<Session>,
}

impl AppContext {
    pub fn init(global: &GlobalOpts) -> Result<Self> {
        let paths = StatePaths::resolve(global.state_dir.as_deref());
        let config = Config::load(&paths);
        let gateway = HttpGateway::new(&config.base_url(global.base_url.as_deref()))?;
        let session = SessionStore::at(paths.session_file()).load();

        Ok(Self {
            paths,
            config,
            gateway,
            session,
        })
    }

    pub fn session_store(&self) -> SessionStore {
        SessionStore::at(self.paths.session_file())
    }

    /// Most commands talk to the API and need a login first
    pub fn require_session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or_else(|| {
            miette::miette!(
                "not logged in; run {} first",
                style("vit login").yellow()
            )
        })
    }

    /// A store bound to the on-disk cache and the session credential
    pub fn store(&self) -> Result<InventoryStore<'_>> {
        let cache = QueryCache::open(&self.paths.cache_file())?;
        Ok(InventoryStore::new(
            &self.gateway,
            cache,
            self.session.as_ref().map(|s| s.credential.clone()),
        ))
    }

    /// Requested format, falling back to the configured default
    pub fn format(&self, global: &GlobalOpts) -> OutputFormat {
        if global.format != OutputFormat::Auto {
            return global.format;
        }
        match self.config.default_format.as_deref() {
            Some("table") => OutputFormat::Table,
            Some("json") => OutputFormat::Json,
            Some("yaml") => OutputFormat::Yaml,
            Some("csv") => OutputFormat::Csv,
            Some("id") => OutputFormat::Id,
            _ => OutputFormat::Auto,
        }
    }
}

/// Single-record output: YAML by default, JSON on request
pub fn emit_record<T: serde::Serialize>(record: &T, format: OutputFormat) -> Result<()> {
    use miette::IntoDiagnostic;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(record).into_diagnostic()?
            );
        }
        _ => {
            print!("{}", serde_yml::to_string(record).into_diagnostic()?);
        }
    }
    Ok(())
}
