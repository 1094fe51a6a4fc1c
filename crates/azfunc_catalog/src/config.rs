//! Catalog acquisition settings.

use std::path::PathBuf;

/// Default functions portal.
pub const DEFAULT_PORTAL_URL: &str = "https://functions.azure.com";

/// The portal only answers browser-like clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.113 Safari/537.36";

/// Where catalogs come from and where they are cached.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the functions portal.
    pub portal_url: String,
    /// User-Agent header sent to the portal.
    pub user_agent: String,
    /// File backing the global state cache.
    pub cache_path: PathBuf,
    /// Root holding `resources/templates/{runtime}/`.
    pub backup_root: PathBuf,
    /// Skip the portal and go straight to cache and backup.
    pub offline: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            portal_url: DEFAULT_PORTAL_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_path: PathBuf::from(".azfunc").join("state.json"),
            backup_root: PathBuf::from("."),
            offline: false,
        }
    }
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `AZFUNC_PORTAL_URL`, `AZFUNC_CACHE_PATH`,
    /// `AZFUNC_BACKUP_ROOT`, and `AZFUNC_OFFLINE`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("AZFUNC_PORTAL_URL") {
            if !url.is_empty() {
                config.portal_url = url;
            }
        }
        if let Ok(path) = std::env::var("AZFUNC_CACHE_PATH") {
            if !path.is_empty() {
                config.cache_path = PathBuf::from(path);
            }
        }
        if let Ok(path) = std::env::var("AZFUNC_BACKUP_ROOT") {
            if !path.is_empty() {
                config.backup_root = PathBuf::from(path);
            }
        }
        if let Ok(offline) = std::env::var("AZFUNC_OFFLINE") {
            config.offline = matches!(offline.as_str(), "1" | "true" | "yes");
        }

        config
    }

    pub fn with_portal_url(mut self, url: impl Into<String>) -> Self {
        self.portal_url = url.into();
        self
    }

    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    pub fn with_backup_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_root = path.into();
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = CatalogConfig::new()
            .with_portal_url("http://localhost:1234")
            .with_backup_root("/opt/azfunc")
            .offline(true);

        assert_eq!(config.portal_url, "http://localhost:1234");
        assert_eq!(config.backup_root, PathBuf::from("/opt/azfunc"));
        assert!(config.offline);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
