//! Turning the three raw catalog documents into templates and config.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{TemplateError, TemplateResult};
use crate::resources::Resources;
use crate::template::Template;

/// A template entry that could not be parsed and was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTemplate {
    /// Template id, when the entry had one.
    pub id: Option<String>,
    pub reason: String,
}

/// Result of parsing one runtime's catalog documents.
#[derive(Debug, Clone)]
pub struct ParsedCatalog {
    pub resources: Arc<Resources>,
    pub templates: Vec<Template>,
    pub config: Config,
    pub skipped: Vec<SkippedTemplate>,
}

/// Parse the resources, templates, and binding config documents of a runtime.
///
/// A template that fails to parse is recorded in
/// [`ParsedCatalog::skipped`] and the rest of the catalog still loads.
/// Malformed resources or config documents, or a templates document that is
/// not an array, fail the whole catalog.
pub fn parse_templates(
    raw_resources: &Value,
    raw_templates: &Value,
    raw_config: &Value,
) -> TemplateResult<ParsedCatalog> {
    let resources = Arc::new(Resources::from_value(raw_resources)?);

    let entries = raw_templates
        .as_array()
        .ok_or_else(|| TemplateError::InvalidCatalog {
            document: "templates",
            message: "expected an array of templates".to_string(),
        })?;

    let (templates, skipped) = entries.iter().fold(
        (Vec::with_capacity(entries.len()), Vec::new()),
        |(mut templates, mut skipped), raw| {
            match Template::from_value(raw) {
                Ok(template) => templates.push(template),
                Err(e) => {
                    let id = raw.get("id").and_then(Value::as_str).map(String::from);
                    warn!("Skipping template {}: {}", id.as_deref().unwrap_or("<unknown>"), e);
                    skipped.push(SkippedTemplate {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
            (templates, skipped)
        },
    );

    let config = Config::from_value(raw_config, Arc::clone(&resources))?;

    debug!(
        "Parsed {} templates ({} skipped), {} bindings",
        templates.len(),
        skipped.len(),
        config.bindings().len()
    );

    Ok(ParsedCatalog {
        resources,
        templates,
        config,
        skipped,
    })
}
