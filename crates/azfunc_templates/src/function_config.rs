//! The `function.json` skeleton embedded in each template.

use serde_json::{Map, Value};

use crate::error::{TemplateError, TemplateResult};

/// User answers keyed by setting name.
pub type SettingAnswers = std::collections::BTreeMap<String, Value>;

/// Parsed `function.json` with its trigger (the `in` binding) located.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionConfig {
    function_json: Value,
    disabled: bool,
    in_binding: Option<usize>,
}

impl FunctionConfig {
    pub fn from_value(raw: Option<&Value>) -> TemplateResult<Self> {
        let function_json = match raw {
            None | Some(Value::Null) => {
                return Err(TemplateError::InvalidFunctionJson(
                    "Function json is null or undefined".to_string(),
                ))
            }
            Some(value) => value.clone(),
        };

        let bindings = function_json
            .get("bindings")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                TemplateError::InvalidFunctionJson(
                    "Expected \"bindings\" element to be an array".to_string(),
                )
            })?;

        let in_binding = bindings
            .iter()
            .position(|binding| binding.get("direction").and_then(Value::as_str) == Some("in"));
        let disabled = function_json.get("disabled").and_then(Value::as_bool) == Some(true);

        Ok(Self {
            function_json,
            disabled,
            in_binding,
        })
    }

    pub fn function_json(&self) -> &Value {
        &self.function_json
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn bindings(&self) -> &[Value] {
        self.function_json
            .get("bindings")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn in_binding(&self) -> Option<&Map<String, Value>> {
        self.in_binding
            .and_then(|index| self.bindings().get(index))
            .and_then(Value::as_object)
    }

    pub fn in_binding_type(&self) -> Option<&str> {
        self.in_binding()
            .and_then(|binding| binding.get("type"))
            .and_then(Value::as_str)
    }

    pub fn is_http_trigger(&self) -> bool {
        self.in_binding_type()
            .is_some_and(|binding_type| binding_type.to_ascii_lowercase().starts_with("http"))
    }

    /// Write user answers into the trigger binding.
    pub fn apply_settings(&mut self, answers: &SettingAnswers) -> TemplateResult<()> {
        if answers.is_empty() {
            return Ok(());
        }

        let binding = self
            .in_binding
            .and_then(|index| {
                self.function_json
                    .get_mut("bindings")
                    .and_then(Value::as_array_mut)
                    .and_then(|bindings| bindings.get_mut(index))
            })
            .and_then(Value::as_object_mut)
            .ok_or_else(|| {
                TemplateError::InvalidFunctionJson(
                    "No trigger binding to apply settings to".to_string(),
                )
            })?;

        for (name, value) in answers {
            binding.insert(name.clone(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn http_function() -> Value {
        json!({
            "disabled": false,
            "bindings": [
                { "authLevel": "function", "type": "httpTrigger", "direction": "in", "name": "req" },
                { "type": "http", "direction": "out", "name": "res" }
            ]
        })
    }

    #[test]
    fn test_locates_in_binding() {
        let config = FunctionConfig::from_value(Some(&http_function())).unwrap();
        assert_eq!(config.in_binding_type(), Some("httpTrigger"));
        assert!(config.is_http_trigger());
        assert!(!config.disabled());
        assert_eq!(config.bindings().len(), 2);
    }

    #[test]
    fn test_rejects_missing_or_malformed() {
        assert!(FunctionConfig::from_value(None).is_err());
        assert!(FunctionConfig::from_value(Some(&Value::Null)).is_err());
        let err = FunctionConfig::from_value(Some(&json!({ "bindings": {} }))).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse function.json"));
    }

    #[test]
    fn test_apply_settings() {
        let mut config = FunctionConfig::from_value(Some(&http_function())).unwrap();
        let answers = SettingAnswers::from([("authLevel".to_string(), json!("anonymous"))]);
        config.apply_settings(&answers).unwrap();

        assert_eq!(config.in_binding().unwrap()["authLevel"], json!("anonymous"));
        assert_eq!(config.bindings()[1]["name"], json!("res"));
    }

    #[test]
    fn test_apply_settings_without_trigger() {
        let mut config =
            FunctionConfig::from_value(Some(&json!({ "bindings": [{ "direction": "out" }] })))
                .unwrap();
        assert!(!config.is_http_trigger());
        assert!(config.apply_settings(&SettingAnswers::new()).is_ok());
        let answers = SettingAnswers::from([("path".to_string(), json!("x"))]);
        assert!(config.apply_settings(&answers).is_err());
    }
}
