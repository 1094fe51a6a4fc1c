//! # azfunc_catalog
//!
//! Acquisition of the Azure Functions template catalog.
//!
//! Catalog documents are fetched from the functions portal, cached in a
//! key/value global state file, and fall back to a backup bundled with the
//! installation. [`TemplateProvider`] ties the three together and hands the
//! raw documents to [`azfunc_templates::parse_templates`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use azfunc_catalog::{CatalogConfig, TemplateProvider};
//!
//! # async fn run() -> azfunc_catalog::CatalogResult<()> {
//! let config = CatalogConfig::from_env();
//! let mut provider = TemplateProvider::from_config(&config);
//! let loaded = provider.load().await?;
//! println!("{} runtimes loaded", loaded.data.runtimes().len());
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod config;
pub mod document;
pub mod error;
pub mod portal;
pub mod provider;
pub mod state;

pub use backup::BackupSource;
pub use config::{CatalogConfig, DEFAULT_PORTAL_URL, DEFAULT_USER_AGENT};
pub use document::{CatalogDocument, RawCatalog};
pub use error::{CatalogError, CatalogResult};
pub use portal::PortalClient;
pub use provider::{CatalogLoad, CatalogSource, RuntimeLoad, TemplateProvider};
pub use state::{FileGlobalState, GlobalState};
