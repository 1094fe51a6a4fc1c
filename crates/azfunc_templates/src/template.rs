//! Function templates (`templates.json` entries).

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{TemplateError, TemplateResult};
use crate::function_config::{FunctionConfig, SettingAnswers};
use crate::resources::Resources;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemplateMetadata {
    default_function_name: String,
    name: String,
    language: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    user_prompt: Option<Vec<String>>,
    #[serde(default)]
    category: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    id: String,
    #[serde(default)]
    function: Option<Value>,
    metadata: TemplateMetadata,
    #[serde(default)]
    files: BTreeMap<String, String>,
}

/// One function template of a runtime's catalog.
#[derive(Debug, Clone)]
pub struct Template {
    id: String,
    metadata: TemplateMetadata,
    files: BTreeMap<String, String>,
    function_config: FunctionConfig,
}

/// Files of a template after the user's answers were applied.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedFunction {
    /// Template files, written verbatim.
    pub files: BTreeMap<String, String>,
    /// The `function.json` with answers merged into the trigger binding.
    pub function_json: Value,
}

impl Template {
    /// Parse a raw template entry.
    ///
    /// Fails when the entry does not have the expected shape or when its
    /// embedded `function` object is not a valid `function.json`.
    pub fn from_value(raw: &Value) -> TemplateResult<Self> {
        let parsed = RawTemplate::deserialize(raw).map_err(|e| TemplateError::InvalidTemplate {
            template: raw_id(raw).unwrap_or("<unknown>").to_string(),
            message: e.to_string(),
        })?;
        let function_config = FunctionConfig::from_value(parsed.function.as_ref())?;

        Ok(Self {
            id: parsed.id,
            metadata: parsed.metadata,
            files: parsed.files,
            function_config,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name, resolved against the catalog's resources.
    pub fn name(&self, resources: &Resources) -> Option<String> {
        resources.get_value(&self.metadata.name)
    }

    pub fn description(&self, resources: &Resources) -> Option<String> {
        self.metadata
            .description
            .as_deref()
            .and_then(|description| resources.get_value(description))
    }

    pub fn default_function_name(&self) -> &str {
        &self.metadata.default_function_name
    }

    pub fn language(&self) -> &str {
        &self.metadata.language
    }

    pub fn is_category(&self, category: &str) -> bool {
        self.metadata.category.iter().any(|c| c == category)
    }

    pub fn categories(&self) -> &[String] {
        &self.metadata.category
    }

    /// Setting names to prompt for, in order.
    pub fn user_prompted_settings(&self) -> &[String] {
        self.metadata.user_prompt.as_deref().unwrap_or_default()
    }

    pub fn template_files(&self) -> &BTreeMap<String, String> {
        &self.files
    }

    pub fn function_config(&self) -> &FunctionConfig {
        &self.function_config
    }

    pub fn is_http_trigger(&self) -> bool {
        self.function_config.is_http_trigger()
    }

    /// Apply answers to a copy of the function config and collect the files
    /// to write.
    pub fn materialize(&self, answers: &SettingAnswers) -> TemplateResult<MaterializedFunction> {
        let mut function_config = self.function_config.clone();
        function_config.apply_settings(answers)?;

        Ok(MaterializedFunction {
            files: self.files.clone(),
            function_json: function_config.function_json().clone(),
        })
    }
}

/// Strip the language suffix from a template id (`HttpTrigger-JavaScript`
/// becomes `HttpTrigger`).
pub fn remove_language_from_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

fn raw_id(raw: &Value) -> Option<&str> {
    raw.get("id").and_then(Value::as_str)
}
