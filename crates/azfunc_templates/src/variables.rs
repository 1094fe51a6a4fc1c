//! `[variables('name')]` references from `bindingconfig.json`.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::debug;

use crate::resources::Resources;

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[variables\('(.*)'\)\]").unwrap())
}

/// Variable table of one binding config document, plus the resources its
/// values resolve against.
///
/// Every setting of a [`Config`](crate::config::Config) is resolved against
/// the same instance; it is handed to the setting getters explicitly.
#[derive(Debug, Clone)]
pub struct ConfigVariables {
    variables: HashMap<String, String>,
    resources: Arc<Resources>,
}

impl ConfigVariables {
    pub fn new(variables: HashMap<String, String>, resources: Arc<Resources>) -> Self {
        Self {
            variables,
            resources,
        }
    }

    /// Resolve a string that may hold a variable reference, a resource
    /// reference, or both (variable first, then resource).
    ///
    /// A reference to an undefined variable keeps the input as-is before it
    /// goes through resource lookup.
    pub fn get_value(&self, data: &str) -> Option<String> {
        let substituted = match variable_pattern().captures(data) {
            Some(caps) => match self.variables.get(&caps[1]) {
                Some(value) => value.as_str(),
                None => {
                    debug!("Undefined variable reference: {}", data);
                    data
                }
            },
            None => data,
        };

        self.resources.get_value(substituted)
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variables() -> ConfigVariables {
        let resources = Resources::new(HashMap::from([("foo".to_string(), "bar".to_string())]));
        ConfigVariables::new(
            HashMap::from([
                ("x".to_string(), "$foo".to_string()),
                ("plain".to_string(), "value".to_string()),
            ]),
            Arc::new(resources),
        )
    }

    #[test]
    fn test_variable_then_resource() {
        assert_eq!(variables().get_value("[variables('x')]"), Some("bar".to_string()));
    }

    #[test]
    fn test_variable_without_resource() {
        assert_eq!(variables().get_value("[variables('plain')]"), Some("value".to_string()));
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(variables().get_value("literal"), Some("literal".to_string()));
    }

    #[test]
    fn test_resource_without_variable() {
        assert_eq!(variables().get_value("$foo"), Some("bar".to_string()));
    }

    #[test]
    fn test_undefined_variable_keeps_input() {
        assert_eq!(
            variables().get_value("[variables('nope')]"),
            Some("[variables('nope')]".to_string())
        );
    }
}
