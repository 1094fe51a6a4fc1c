//! Binding configuration (`bindingconfig.json`).

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{TemplateError, TemplateResult};
use crate::resources::Resources;
use crate::setting::ConfigSetting;
use crate::variables::ConfigVariables;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBinding {
    #[serde(rename = "type")]
    binding_type: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    settings: Vec<ConfigSetting>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    variables: HashMap<String, Value>,
    #[serde(default)]
    bindings: Vec<RawBinding>,
}

/// Settings of one trigger or binding type (e.g. `queueTrigger`).
#[derive(Debug, Clone)]
pub struct ConfigBinding {
    binding_type: String,
    display_name: Option<String>,
    direction: Option<String>,
    settings: Vec<ConfigSetting>,
}

impl ConfigBinding {
    pub fn binding_type(&self) -> &str {
        &self.binding_type
    }

    pub fn display_name(&self, variables: &ConfigVariables) -> Option<String> {
        self.display_name
            .as_deref()
            .and_then(|name| variables.get_value(name))
    }

    pub fn direction(&self) -> Option<&str> {
        self.direction.as_deref()
    }

    pub fn settings(&self) -> &[ConfigSetting] {
        &self.settings
    }

    /// First setting whose resolved name equals `name`.
    pub fn setting(&self, name: &str, variables: &ConfigVariables) -> Option<&ConfigSetting> {
        self.settings
            .iter()
            .find(|setting| setting.name(variables).as_deref() == Some(name))
    }
}

/// A parsed binding configuration document.
#[derive(Debug, Clone)]
pub struct Config {
    variables: ConfigVariables,
    bindings: Vec<ConfigBinding>,
}

impl Config {
    /// Parse a raw `bindingconfig.json` document.
    ///
    /// All bindings and settings share one [`ConfigVariables`] built from the
    /// document's variable table and `resources`.
    pub fn from_value(raw: &Value, resources: Arc<Resources>) -> TemplateResult<Self> {
        let raw = RawConfig::deserialize(raw).map_err(|e| TemplateError::InvalidCatalog {
            document: "bindingconfig",
            message: e.to_string(),
        })?;

        let variables = raw
            .variables
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect();

        let bindings = raw
            .bindings
            .into_iter()
            .map(|binding| ConfigBinding {
                binding_type: binding.binding_type,
                display_name: binding.display_name,
                direction: binding.direction,
                settings: binding.settings,
            })
            .collect();

        Ok(Self {
            variables: ConfigVariables::new(variables, resources),
            bindings,
        })
    }

    pub fn variables(&self) -> &ConfigVariables {
        &self.variables
    }

    pub fn bindings(&self) -> &[ConfigBinding] {
        &self.bindings
    }

    /// First binding declared for `binding_type`.
    pub fn binding(&self, binding_type: &str) -> Option<&ConfigBinding> {
        self.bindings
            .iter()
            .find(|binding| binding.binding_type == binding_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resources() -> Arc<Resources> {
        Arc::new(Resources::new(HashMap::from([(
            "variables_path".to_string(),
            "Path".to_string(),
        )])))
    }

    #[test]
    fn test_parse_config() {
        let config = Config::from_value(
            &json!({
                "variables": { "pathLabel": "$variables_path", "retries": 3 },
                "bindings": [
                    {
                        "type": "blobTrigger",
                        "direction": "in",
                        "settings": [
                            { "name": "path", "value": "string", "label": "[variables('pathLabel')]" }
                        ]
                    },
                    { "type": "httpTrigger", "settings": [] }
                ]
            }),
            resources(),
        )
        .unwrap();

        assert_eq!(config.bindings().len(), 2);
        let blob = config.binding("blobTrigger").unwrap();
        assert_eq!(blob.direction(), Some("in"));
        let setting = blob.setting("path", config.variables()).unwrap();
        assert_eq!(setting.label(config.variables()), Some("Path".to_string()));
        assert!(config.binding("queueTrigger").is_none());
        assert_eq!(config.variables().get_value("[variables('retries')]"), Some("3".to_string()));
    }

    #[test]
    fn test_first_binding_wins() {
        let config = Config::from_value(
            &json!({
                "bindings": [
                    { "type": "queueTrigger", "settings": [{ "name": "first", "value": "string" }] },
                    { "type": "queueTrigger", "settings": [{ "name": "second", "value": "string" }] }
                ]
            }),
            resources(),
        )
        .unwrap();

        let binding = config.binding("queueTrigger").unwrap();
        assert!(binding.setting("first", config.variables()).is_some());
        assert!(binding.setting("second", config.variables()).is_none());
    }

    #[test]
    fn test_malformed_setting_fails_config() {
        let result = Config::from_value(
            &json!({ "bindings": [{ "type": "x", "settings": [{ "label": "no name" }] }] }),
            resources(),
        );
        assert!(matches!(result, Err(TemplateError::InvalidCatalog { .. })));
    }
}
