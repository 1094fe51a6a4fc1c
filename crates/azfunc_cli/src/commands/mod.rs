//! CLI command definitions.
//!
//! Every subcommand works on the template catalog, which is loaded the same
//! way for all of them (portal, then cache, then bundled backup).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

use azfunc_catalog::{CatalogConfig, CatalogLoad, TemplateProvider};
use azfunc_templates::settings::{project_language, project_runtime, template_filter};
use azfunc_templates::{
    ProjectLanguage, ProjectRuntime, TemplateFilter, TemplateQuery, WorkspaceSettings,
};

pub mod create;
pub mod list;
pub mod refresh;
pub mod show;

/// azfunc - Azure Functions templates from the command line
#[derive(Parser)]
#[command(name = "azfunc")]
#[command(version, about = "azfunc - Azure Functions templates from the command line")]
#[command(long_about = r#"
azfunc loads the Azure Functions template catalog and creates functions
from it.

COMMANDS:
  list     → List templates for a language, runtime, and filter
  show     → Show a template and the settings it prompts for
  create   → Create a function in a project from a template
  refresh  → Re-download the catalog into the local cache

The catalog is fetched from the functions portal, falling back to the
local cache and then to the bundled backup.

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Catalog error
  4 - Template error
  5 - Cancelled
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List templates
    List(list::ListArgs),

    /// Show a template's details and settings
    Show(show::ShowArgs),

    /// Create a function from a template
    Create(create::CreateArgs),

    /// Refresh the cached catalog from the portal
    Refresh(refresh::RefreshArgs),
}

/// Where the catalog comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Do not contact the portal; use the cache or bundled backup
    #[arg(long, global = true)]
    pub offline: bool,

    /// Functions portal base URL
    #[arg(long, global = true, env = "AZFUNC_PORTAL_URL")]
    pub portal_url: Option<String>,

    /// Cache file for downloaded catalogs
    #[arg(long, global = true, env = "AZFUNC_CACHE_PATH")]
    pub cache_path: Option<PathBuf>,

    /// Directory containing resources/templates/<runtime>/
    #[arg(long, global = true, env = "AZFUNC_BACKUP_ROOT")]
    pub backup_root: Option<PathBuf>,
}

impl CatalogArgs {
    pub fn config(&self) -> CatalogConfig {
        let mut config = CatalogConfig::from_env();
        if let Some(url) = &self.portal_url {
            config = config.with_portal_url(url.clone());
        }
        if let Some(path) = &self.cache_path {
            config = config.with_cache_path(path.clone());
        }
        if let Some(path) = &self.backup_root {
            config = config.with_backup_root(path.clone());
        }
        if self.offline {
            config = config.offline(true);
        }
        config
    }
}

/// Template query options shared by `list` and `create`.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Project language (defaults to the project's setting)
    #[arg(short, long)]
    pub language: Option<ProjectLanguage>,

    /// Functions runtime: ~1, ~2 or beta (defaults to the project's setting)
    #[arg(short, long)]
    pub runtime: Option<ProjectRuntime>,

    /// Template filter: Verified, Core or All (defaults to the project's setting)
    #[arg(short, long, value_parser = parse_filter)]
    pub filter: Option<TemplateFilter>,
}

impl QueryArgs {
    /// Explicit options first, then workspace settings, then defaults.
    pub fn resolve(&self, settings: &dyn WorkspaceSettings, project: &Path) -> TemplateQuery {
        let language = self
            .language
            .or_else(|| project_language(settings, project))
            .unwrap_or(ProjectLanguage::JavaScript);
        let runtime = self
            .runtime
            .or_else(|| project_runtime(settings, project))
            .unwrap_or_default();
        let filter = self
            .filter
            .unwrap_or_else(|| template_filter(settings, project));

        TemplateQuery::new(language, runtime, filter)
    }
}

fn parse_filter(s: &str) -> Result<TemplateFilter, String> {
    match s.to_ascii_lowercase().as_str() {
        "all" | "core" | "verified" => Ok(TemplateFilter::parse_or_default(s)),
        _ => Err(format!("expected Verified, Core or All, got '{}'", s)),
    }
}

/// Load the catalog, reporting templates that had to be skipped.
pub async fn load_catalog(args: &CatalogArgs) -> Result<CatalogLoad> {
    let config = args.config();
    debug!("Catalog config: {:?}", config);

    let mut provider = TemplateProvider::from_config(&config);
    let loaded = provider
        .load()
        .await
        .context("Failed to load the template catalog")?;

    for runtime in &loaded.runtimes {
        for skipped in &runtime.skipped {
            warn!(
                "Skipped template {} for runtime {}: {}",
                skipped.id.as_deref().unwrap_or("<unknown>"),
                runtime.runtime,
                skipped.reason
            );
        }
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use azfunc_templates::JsonWorkspaceSettings;
    use tempfile::tempdir;

    #[test]
    fn test_query_prefers_explicit_args() {
        let temp = tempdir().unwrap();
        let mut settings = JsonWorkspaceSettings::new();
        settings
            .update(temp.path(), "projectLanguage", "C#")
            .unwrap();
        settings.update(temp.path(), "templateFilter", "All").unwrap();

        let args = QueryArgs {
            runtime: Some(ProjectRuntime::Beta),
            ..Default::default()
        };
        let query = args.resolve(&settings, temp.path());

        assert_eq!(query.language, ProjectLanguage::CSharp);
        assert_eq!(query.runtime, ProjectRuntime::Beta);
        assert_eq!(query.filter, TemplateFilter::All);
    }

    #[test]
    fn test_query_defaults() {
        let temp = tempdir().unwrap();
        let query = QueryArgs::default().resolve(&JsonWorkspaceSettings::new(), temp.path());

        assert_eq!(query.language, ProjectLanguage::JavaScript);
        assert_eq!(query.runtime, ProjectRuntime::V1);
        assert_eq!(query.filter, TemplateFilter::Verified);
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("core"), Ok(TemplateFilter::Core));
        assert!(parse_filter("bogus").is_err());
    }

    #[test]
    fn test_cli_parses_global_catalog_args() {
        let cli = Cli::parse_from(["azfunc", "list", "--offline", "-l", "python"]);
        assert!(cli.catalog.offline);
        assert!(cli.catalog.config().offline);
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.query.language, Some(ProjectLanguage::Python))
            }
            _ => panic!("expected list"),
        }
    }
}
