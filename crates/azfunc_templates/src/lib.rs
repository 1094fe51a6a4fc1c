//! # azfunc_templates
//!
//! Azure Functions template catalog parsing and resolution.
//!
//! A runtime's catalog is made of three JSON documents:
//!
//! - `resources.json`: localized strings, referenced as `$key`
//! - `templates.json`: function templates (`function.json` skeleton, files, metadata)
//! - `bindingconfig.json`: the settings each trigger/binding type prompts for,
//!   with a variable table referenced as `[variables('name')]`
//!
//! [`parse_templates`] turns those into [`Template`]s and a [`Config`];
//! [`TemplateData`] holds every runtime's catalog and selects templates by
//! language, runtime, and [`TemplateFilter`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use azfunc_templates::{
//!     parse_templates, ProjectLanguage, ProjectRuntime, RuntimeCatalog, TemplateData,
//!     TemplateFilter,
//! };
//! # fn documents() -> (serde_json::Value, serde_json::Value, serde_json::Value) { unimplemented!() }
//!
//! let (resources, templates, config) = documents();
//! let parsed = parse_templates(&resources, &templates, &config).unwrap();
//!
//! let mut catalogs = HashMap::new();
//! catalogs.insert(ProjectRuntime::V1, RuntimeCatalog::from(parsed));
//! let data = TemplateData::new(catalogs).unwrap();
//!
//! for template in data.filter_templates(ProjectLanguage::JavaScript, ProjectRuntime::V1, TemplateFilter::Core) {
//!     println!("{}", template.id());
//! }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod function_config;
pub mod language;
pub mod loader;
pub mod prompt;
pub mod resources;
pub mod setting;
pub mod settings;
pub mod template;
pub mod variables;
pub mod writer;

pub use config::{Config, ConfigBinding};
pub use data::{
    RuntimeCatalog, TemplateData, TemplateSelection, JAVA_TEMPLATES, MAX_TEMPLATE_QUERY_ATTEMPTS,
    VERIFIED_CSHARP_TEMPLATES, VERIFIED_TEMPLATES,
};
pub use error::{TemplateError, TemplateResult};
pub use function_config::{FunctionConfig, SettingAnswers};
pub use language::{ProjectLanguage, ProjectRuntime, TemplateCategory, TemplateFilter};
pub use loader::{parse_templates, ParsedCatalog, SkippedTemplate};
pub use prompt::{BoundSetting, TemplatePrompter, TemplateQuery};
pub use resources::Resources;
pub use setting::{ConfigSetting, ConfigValidator, EnumValue, ResourceType, ValueType};
pub use settings::{JsonWorkspaceSettings, WorkspaceSettings};
pub use template::{remove_language_from_id, MaterializedFunction, Template};
pub use variables::ConfigVariables;
pub use writer::{unique_function_name, validate_function_name, write_function};
