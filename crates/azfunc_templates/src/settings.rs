//! Per-project workspace settings (`.vscode/settings.json`).

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::TemplateResult;
use crate::language::{ProjectLanguage, ProjectRuntime, TemplateFilter};

/// Prefix of every setting key this crate owns.
pub const SETTINGS_PREFIX: &str = "azureFunctions";
pub const PROJECT_LANGUAGE_SETTING: &str = "projectLanguage";
pub const PROJECT_RUNTIME_SETTING: &str = "projectRuntime";
pub const TEMPLATE_FILTER_SETTING: &str = "templateFilter";

/// Store for project-scoped settings.
pub trait WorkspaceSettings {
    fn get(&self, project_path: &Path, key: &str) -> Option<String>;

    fn update(&mut self, project_path: &Path, key: &str, value: &str) -> TemplateResult<()>;
}

/// Settings kept in the project's `.vscode/settings.json`, keys prefixed
/// with `azureFunctions.`. Other keys in the file are preserved.
#[derive(Debug, Clone, Default)]
pub struct JsonWorkspaceSettings;

impl JsonWorkspaceSettings {
    pub fn new() -> Self {
        Self
    }

    pub fn settings_path(project_path: &Path) -> PathBuf {
        project_path.join(".vscode").join("settings.json")
    }

    fn full_key(key: &str) -> String {
        format!("{}.{}", SETTINGS_PREFIX, key)
    }

    fn read(project_path: &Path) -> Map<String, Value> {
        let path = Self::settings_path(project_path);
        let Ok(content) = fs::read_to_string(&path) else {
            return Map::new();
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("Ignoring non-object settings file {:?}", path);
                Map::new()
            }
            Err(e) => {
                warn!("Failed to parse settings file {:?}: {}", path, e);
                Map::new()
            }
        }
    }
}

impl WorkspaceSettings for JsonWorkspaceSettings {
    fn get(&self, project_path: &Path, key: &str) -> Option<String> {
        Self::read(project_path)
            .get(&Self::full_key(key))
            .and_then(Value::as_str)
            .map(String::from)
    }

    fn update(&mut self, project_path: &Path, key: &str, value: &str) -> TemplateResult<()> {
        let path = Self::settings_path(project_path);
        let mut settings = Self::read(project_path);
        settings.insert(Self::full_key(key), Value::String(value.to_string()));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(&Value::Object(settings))?)?;
        debug!("Updated {} in {:?}", key, path);
        Ok(())
    }
}

/// Configured project language, if set and recognized.
pub fn project_language(
    settings: &dyn WorkspaceSettings,
    project_path: &Path,
) -> Option<ProjectLanguage> {
    settings
        .get(project_path, PROJECT_LANGUAGE_SETTING)
        .and_then(|value| value.parse().ok())
}

/// Configured project runtime, if set and recognized.
pub fn project_runtime(
    settings: &dyn WorkspaceSettings,
    project_path: &Path,
) -> Option<ProjectRuntime> {
    settings
        .get(project_path, PROJECT_RUNTIME_SETTING)
        .and_then(|value| value.parse().ok())
}

/// Configured template filter; unset or unrecognized values mean verified.
pub fn template_filter(settings: &dyn WorkspaceSettings, project_path: &Path) -> TemplateFilter {
    settings
        .get(project_path, TEMPLATE_FILTER_SETTING)
        .map(|value| TemplateFilter::parse_or_default(&value))
        .unwrap_or_default()
}
