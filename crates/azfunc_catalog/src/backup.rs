//! Catalogs bundled with the installation.

use std::fs;
use std::path::{Path, PathBuf};

use azfunc_templates::ProjectRuntime;
use tracing::debug;

use crate::document::{CatalogDocument, RawCatalog};
use crate::error::{CatalogError, CatalogResult};

/// Reads `{root}/resources/templates/{runtime}/{document}.json`.
#[derive(Debug, Clone)]
pub struct BackupSource {
    root: PathBuf,
}

impl BackupSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn runtime_dir(&self, runtime: ProjectRuntime) -> PathBuf {
        self.root
            .join("resources")
            .join("templates")
            .join(runtime.as_str())
    }

    pub fn read(&self, runtime: ProjectRuntime) -> CatalogResult<RawCatalog> {
        let dir = self.runtime_dir(runtime);
        Ok(RawCatalog {
            resources: read_document(&dir, CatalogDocument::Resources)?,
            templates: read_document(&dir, CatalogDocument::Templates)?,
            config: read_document(&dir, CatalogDocument::BindingConfig)?,
        })
    }

    /// Write a catalog in backup layout, e.g. to refresh bundled files.
    pub fn write(&self, runtime: ProjectRuntime, raw: &RawCatalog) -> CatalogResult<()> {
        let dir = self.runtime_dir(runtime);
        fs::create_dir_all(&dir)?;
        for document in CatalogDocument::all() {
            fs::write(
                dir.join(document.file_name()),
                serde_json::to_string_pretty(raw.get(document))?,
            )?;
        }
        Ok(())
    }
}

fn read_document(dir: &Path, document: CatalogDocument) -> CatalogResult<serde_json::Value> {
    let path = dir.join(document.file_name());
    if !path.exists() {
        return Err(CatalogError::BackupNotFound(path));
    }
    debug!("Reading backup {:?}", path);
    let content = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() {
        let temp = tempdir().unwrap();
        let backup = BackupSource::new(temp.path());
        let raw = RawCatalog {
            resources: json!({ "en": {} }),
            templates: json!([]),
            config: json!({ "bindings": [] }),
        };

        backup.write(ProjectRuntime::Beta, &raw).unwrap();
        assert!(temp
            .path()
            .join("resources/templates/beta/bindingconfig.json")
            .exists());
        assert_eq!(backup.read(ProjectRuntime::Beta).unwrap(), raw);
    }

    #[test]
    fn test_missing_backup() {
        let temp = tempdir().unwrap();
        let backup = BackupSource::new(temp.path());
        assert!(matches!(
            backup.read(ProjectRuntime::V1),
            Err(CatalogError::BackupNotFound(_))
        ));
    }
}
