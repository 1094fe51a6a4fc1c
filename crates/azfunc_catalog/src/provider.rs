//! Loading the template catalog of every runtime.
//!
//! For each runtime the sources are tried in order, and the first one that
//! parses wins:
//!
//! 1. the functions portal (written through to the global state cache)
//! 2. the global state cache
//! 3. the bundled backup
//!
//! A runtime where every source fails is left out; whether that is fatal is
//! decided by [`TemplateData::new`].

use std::collections::HashMap;
use std::fmt;

use azfunc_templates::{
    ParsedCatalog, ProjectRuntime, RuntimeCatalog, SkippedTemplate, TemplateData,
};
use tracing::{debug, info, warn};

use crate::backup::BackupSource;
use crate::config::CatalogConfig;
use crate::document::{CatalogDocument, RawCatalog};
use crate::error::{CatalogError, CatalogResult};
use crate::portal::PortalClient;
use crate::state::{FileGlobalState, GlobalState};

/// Where a runtime's catalog was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Portal,
    Cache,
    Backup,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CatalogSource::Portal => "portal",
            CatalogSource::Cache => "cache",
            CatalogSource::Backup => "backup",
        };
        write!(f, "{}", name)
    }
}

/// How one runtime was loaded.
#[derive(Debug, Clone)]
pub struct RuntimeLoad {
    pub runtime: ProjectRuntime,
    pub source: CatalogSource,
    pub template_count: usize,
    pub skipped: Vec<SkippedTemplate>,
}

/// A loaded catalog and how each runtime got there.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub data: TemplateData,
    pub runtimes: Vec<RuntimeLoad>,
}

/// Loads [`TemplateData`] from the portal, cache, or bundled backup.
pub struct TemplateProvider<S: GlobalState> {
    portal: PortalClient,
    state: S,
    backup: BackupSource,
    offline: bool,
}

impl TemplateProvider<FileGlobalState> {
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            PortalClient::from_config(config),
            FileGlobalState::open(&config.cache_path),
            BackupSource::new(config.backup_root.clone()),
        )
        .offline(config.offline)
    }
}

impl<S: GlobalState> TemplateProvider<S> {
    pub fn new(portal: PortalClient, state: S, backup: BackupSource) -> Self {
        Self {
            portal,
            state,
            backup,
            offline: false,
        }
    }

    /// Skip the portal when loading.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Load every runtime and build the validated catalog.
    pub async fn load(&mut self) -> CatalogResult<CatalogLoad> {
        let mut catalogs: HashMap<ProjectRuntime, RuntimeCatalog> = HashMap::new();
        let mut runtimes = Vec::new();

        for runtime in ProjectRuntime::all() {
            match self.load_runtime(runtime).await {
                Some((source, parsed)) => {
                    info!(
                        "Loaded {} templates for runtime {} from {}",
                        parsed.templates.len(),
                        runtime,
                        source
                    );
                    runtimes.push(RuntimeLoad {
                        runtime,
                        source,
                        template_count: parsed.templates.len(),
                        skipped: parsed.skipped.clone(),
                    });
                    catalogs.insert(runtime, parsed.into());
                }
                None => warn!("No template catalog available for runtime {}", runtime),
            }
        }

        let data = TemplateData::new(catalogs)?;
        Ok(CatalogLoad { data, runtimes })
    }

    /// Try each source for one runtime; `None` when all of them fail.
    pub async fn load_runtime(
        &mut self,
        runtime: ProjectRuntime,
    ) -> Option<(CatalogSource, ParsedCatalog)> {
        if !self.offline {
            match self.try_from_portal(runtime).await {
                Ok(parsed) => return Some((CatalogSource::Portal, parsed)),
                Err(e) => warn!("Failed to get templates for {} from portal: {}", runtime, e),
            }
        }

        match self.try_from_cache(runtime) {
            Ok(parsed) => return Some((CatalogSource::Cache, parsed)),
            Err(e) => debug!("No usable cached templates for {}: {}", runtime, e),
        }

        match self.from_backup(runtime) {
            Ok(parsed) => Some((CatalogSource::Backup, parsed)),
            Err(e) => {
                warn!("Failed to read backup templates for {}: {}", runtime, e);
                None
            }
        }
    }

    /// Fetch from the portal; on success the raw documents are cached.
    ///
    /// A failed cache write is logged and does not fail the fetch.
    pub async fn try_from_portal(&mut self, runtime: ProjectRuntime) -> CatalogResult<ParsedCatalog> {
        let (raw, parsed) = self.fetch_parsed(runtime).await?;
        if let Err(e) = self.store(runtime, &raw) {
            warn!("Failed to cache templates for {}: {}", runtime, e);
        }
        Ok(parsed)
    }

    async fn fetch_parsed(
        &self,
        runtime: ProjectRuntime,
    ) -> CatalogResult<(RawCatalog, ParsedCatalog)> {
        let raw = self.portal.fetch_all(runtime).await?;
        let parsed = raw.parse()?;
        Ok((raw, parsed))
    }

    pub fn try_from_cache(&self, runtime: ProjectRuntime) -> CatalogResult<ParsedCatalog> {
        Ok(self.cached(runtime)?.parse()?)
    }

    pub fn from_backup(&self, runtime: ProjectRuntime) -> CatalogResult<ParsedCatalog> {
        Ok(self.backup.read(runtime)?.parse()?)
    }

    /// Re-fetch every runtime from the portal into the cache.
    ///
    /// Returns the runtimes that were refreshed; failures are logged and
    /// leave the previous cache entries in place.
    pub async fn refresh_cache(&mut self) -> Vec<ProjectRuntime> {
        let mut refreshed = Vec::new();
        for runtime in ProjectRuntime::all() {
            let result = match self.fetch_parsed(runtime).await {
                Ok((raw, _)) => self.store(runtime, &raw),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => refreshed.push(runtime),
                Err(e) => warn!("Failed to refresh templates for {}: {}", runtime, e),
            }
        }
        refreshed
    }

    fn cached(&self, runtime: ProjectRuntime) -> CatalogResult<RawCatalog> {
        let get = |document: CatalogDocument| {
            let key = document.cache_key(runtime);
            self.state
                .get(&key)
                .ok_or(CatalogError::CacheMiss { key })
        };

        Ok(RawCatalog {
            resources: get(CatalogDocument::Resources)?,
            templates: get(CatalogDocument::Templates)?,
            config: get(CatalogDocument::BindingConfig)?,
        })
    }

    fn store(&mut self, runtime: ProjectRuntime, raw: &RawCatalog) -> CatalogResult<()> {
        for document in CatalogDocument::all() {
            self.state
                .update(&document.cache_key(runtime), raw.get(document).clone())?;
        }
        Ok(())
    }
}
