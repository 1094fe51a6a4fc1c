//! Refresh command - Re-download every runtime's catalog into the cache.

use anyhow::Result;
use clap::Args;
use tracing::info;

use azfunc_catalog::TemplateProvider;

use super::CatalogArgs;

#[derive(Args)]
pub struct RefreshArgs {}

pub async fn execute(_args: RefreshArgs, catalog: &CatalogArgs) -> Result<()> {
    let config = catalog.config();
    if config.offline {
        anyhow::bail!("Cannot refresh the catalog cache while offline");
    }

    info!("Refreshing template cache from {}", config.portal_url);
    let mut provider = TemplateProvider::from_config(&config);
    let refreshed = provider.refresh_cache().await;

    if refreshed.is_empty() {
        anyhow::bail!("Failed to refresh any runtime from {}", config.portal_url);
    }

    let names: Vec<&str> = refreshed.iter().map(|r| r.as_str()).collect();
    println!("✅ Refreshed runtimes: {}", names.join(", "));
    println!("Cache: {:?}", config.cache_path);

    Ok(())
}
