//! Localized resource strings referenced from the catalog as `$key`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};

fn resource_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\$(.*)").unwrap())
}

/// The `en` string table of a `resources.json` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Resources {
    #[serde(default)]
    en: HashMap<String, String>,
}

impl Resources {
    pub fn new(en: HashMap<String, String>) -> Self {
        Self { en }
    }

    /// Parse a raw `resources.json` document.
    pub fn from_value(raw: &serde_json::Value) -> TemplateResult<Self> {
        Resources::deserialize(raw).map_err(|e| TemplateError::InvalidCatalog {
            document: "resources",
            message: e.to_string(),
        })
    }

    /// Resolve a `$key` reference.
    ///
    /// Strings without a leading `$` are returned unchanged. A `$key` with no
    /// entry in the table resolves to `None`.
    pub fn get_value(&self, data: &str) -> Option<String> {
        match resource_pattern().captures(data) {
            Some(caps) => {
                let key = &caps[1];
                let value = self.en.get(key).cloned();
                if value.is_none() {
                    debug!("Unresolved resource reference: {}", data);
                }
                value
            }
            None => Some(data.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.en.len()
    }

    pub fn is_empty(&self) -> bool {
        self.en.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resources() -> Resources {
        Resources::from_value(&json!({ "en": { "foo": "bar" }, "lang": {} })).unwrap()
    }

    #[test]
    fn test_resolves_dollar_key() {
        assert_eq!(resources().get_value("$foo"), Some("bar".to_string()));
    }

    #[test]
    fn test_plain_string_is_identity() {
        assert_eq!(resources().get_value("plain"), Some("plain".to_string()));
        assert_eq!(resources().get_value("costs $5"), Some("costs $5".to_string()));
    }

    #[test]
    fn test_missing_key_is_none() {
        assert_eq!(resources().get_value("$missing"), None);
    }

    #[test]
    fn test_rejects_non_object_document() {
        assert!(Resources::from_value(&json!(["en"])).is_err());
    }
}
