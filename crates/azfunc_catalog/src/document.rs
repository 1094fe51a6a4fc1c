//! The three documents that make up a runtime's catalog.

use azfunc_templates::{parse_templates, ParsedCatalog, ProjectRuntime, TemplateResult};
use serde_json::Value;

/// One catalog document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogDocument {
    Resources,
    Templates,
    BindingConfig,
}

impl CatalogDocument {
    pub fn all() -> [Self; 3] {
        [
            CatalogDocument::Resources,
            CatalogDocument::Templates,
            CatalogDocument::BindingConfig,
        ]
    }

    /// Path segment of the portal API (`/api/{name}`).
    pub fn api_name(&self) -> &'static str {
        match self {
            CatalogDocument::Resources => "resources",
            CatalogDocument::Templates => "templates",
            CatalogDocument::BindingConfig => "bindingconfig",
        }
    }

    /// File name inside a bundled backup directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            CatalogDocument::Resources => "resources.json",
            CatalogDocument::Templates => "templates.json",
            CatalogDocument::BindingConfig => "bindingconfig.json",
        }
    }

    /// Global state key, suffixed with the runtime unless it is the default.
    pub fn cache_key(&self, runtime: ProjectRuntime) -> String {
        let base = match self {
            CatalogDocument::Resources => "FunctionTemplateResources",
            CatalogDocument::Templates => "FunctionTemplates",
            CatalogDocument::BindingConfig => "FunctionTemplateConfig",
        };

        if runtime.is_default() {
            base.to_string()
        } else {
            format!("{}.{}", base, runtime)
        }
    }
}

/// Raw, unparsed documents of one runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCatalog {
    pub resources: Value,
    pub templates: Value,
    pub config: Value,
}

impl RawCatalog {
    pub fn get(&self, document: CatalogDocument) -> &Value {
        match document {
            CatalogDocument::Resources => &self.resources,
            CatalogDocument::Templates => &self.templates,
            CatalogDocument::BindingConfig => &self.config,
        }
    }

    pub fn parse(&self) -> TemplateResult<ParsedCatalog> {
        parse_templates(&self.resources, &self.templates, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys() {
        assert_eq!(
            CatalogDocument::Templates.cache_key(ProjectRuntime::V1),
            "FunctionTemplates"
        );
        assert_eq!(
            CatalogDocument::BindingConfig.cache_key(ProjectRuntime::Beta),
            "FunctionTemplateConfig.beta"
        );
        assert_eq!(
            CatalogDocument::Resources.cache_key(ProjectRuntime::V2),
            "FunctionTemplateResources.~2"
        );
    }
}
