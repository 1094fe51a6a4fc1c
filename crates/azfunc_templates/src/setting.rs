//! Binding settings: the prompts a template asks before it is created.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{TemplateError, TemplateResult};
use crate::variables::ConfigVariables;

/// Kind of value a setting accepts.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub enum ValueType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "checkBoxList")]
    CheckBoxList,
    #[serde(other)]
    Unknown,
}

/// Azure resource a setting is bound to (usually a connection string).
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub enum ResourceType {
    Storage,
    DocumentDB,
    EventHub,
    ServiceBus,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawValidator {
    expression: String,
    error_text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawEnumValue {
    value: Value,
    display: String,
}

/// A regex check with a templated error message.
#[derive(Debug, Clone, Copy)]
pub struct ConfigValidator<'a> {
    expression: &'a str,
    error_text: &'a str,
}

impl<'a> ConfigValidator<'a> {
    /// Regex source, verbatim.
    pub fn expression(&self) -> &'a str {
        self.expression
    }

    pub fn error_text(&self, variables: &ConfigVariables) -> Option<String> {
        variables.get_value(self.error_text)
    }

    /// Whether `value` passes this validator. Absent or empty values never do.
    pub fn is_match(&self, value: Option<&str>) -> bool {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return false;
        };

        match Regex::new(self.expression) {
            Ok(re) => re.is_match(value),
            Err(e) => {
                warn!("Invalid validator expression {:?}: {}", self.expression, e);
                false
            }
        }
    }
}

/// One choice of an enum or check box setting.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    value: String,
    display: String,
}

impl EnumValue {
    pub fn value(&self, variables: &ConfigVariables) -> Option<String> {
        variables.get_value(&self.value)
    }

    pub fn display_name(&self, variables: &ConfigVariables) -> Option<String> {
        variables.get_value(&self.display)
    }
}

/// A single setting of a binding, as declared in `bindingconfig.json`.
///
/// Display strings are resolved on every call against the
/// [`ConfigVariables`] of the owning config; nothing is memoized.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSetting {
    name: String,
    #[serde(rename = "value")]
    value_type: ValueType,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    default_value: Option<Value>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    resource: Option<ResourceType>,
    #[serde(default)]
    validators: Vec<RawValidator>,
    #[serde(default, rename = "enum")]
    enum_values: Option<Vec<RawEnumValue>>,
    #[serde(default)]
    help: Option<String>,
}

impl ConfigSetting {
    pub fn from_value(raw: &Value) -> TemplateResult<Self> {
        ConfigSetting::deserialize(raw).map_err(|e| TemplateError::InvalidCatalog {
            document: "bindingconfig",
            message: e.to_string(),
        })
    }

    pub fn name(&self, variables: &ConfigVariables) -> Option<String> {
        variables.get_value(&self.name)
    }

    pub fn label(&self, variables: &ConfigVariables) -> Option<String> {
        self.label.as_deref().and_then(|label| variables.get_value(label))
    }

    pub fn help(&self, variables: &ConfigVariables) -> Option<String> {
        self.help.as_deref().and_then(|help| variables.get_value(help))
    }

    pub fn default_value(&self, variables: &ConfigVariables) -> Option<String> {
        self.default_value
            .as_ref()
            .and_then(scalar_to_string)
            .and_then(|value| variables.get_value(&value))
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn resource_type(&self) -> Option<ResourceType> {
        self.resource
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Choices of an enum or check box setting; empty when none are declared.
    pub fn enums(&self) -> Vec<EnumValue> {
        self.enum_values
            .iter()
            .flatten()
            .map(|raw| EnumValue {
                value: scalar_to_string(&raw.value).unwrap_or_default(),
                display: raw.display.clone(),
            })
            .collect()
    }

    pub fn validators(&self) -> Vec<ConfigValidator<'_>> {
        self.validators
            .iter()
            .map(|raw| ConfigValidator {
                expression: &raw.expression,
                error_text: &raw.error_text,
            })
            .collect()
    }

    /// Check a user-entered value against the declared validators.
    ///
    /// Returns the error text of the first validator (in declaration order)
    /// that rejects the value, or `None` when the value is accepted.
    pub fn validate_setting(
        &self,
        value: Option<&str>,
        variables: &ConfigVariables,
    ) -> Option<String> {
        self.validators()
            .into_iter()
            .find(|validator| !validator.is_match(value))
            .map(|validator| {
                validator
                    .error_text(variables)
                    .unwrap_or_else(|| validator.error_text.to_string())
            })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
