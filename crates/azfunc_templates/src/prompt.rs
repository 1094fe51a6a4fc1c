//! The user-interaction seam: template queries and the prompts that drive them.

use serde_json::Value;

use crate::config::ConfigBinding;
use crate::error::TemplateResult;
use crate::language::{ProjectLanguage, ProjectRuntime, TemplateFilter};
use crate::setting::{ConfigSetting, EnumValue, ResourceType, ValueType};
use crate::variables::ConfigVariables;

/// Language, runtime, and filter that select a set of templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateQuery {
    pub language: ProjectLanguage,
    pub runtime: ProjectRuntime,
    pub filter: TemplateFilter,
}

impl TemplateQuery {
    pub fn new(language: ProjectLanguage, runtime: ProjectRuntime, filter: TemplateFilter) -> Self {
        Self {
            language,
            runtime,
            filter,
        }
    }
}

/// A setting together with the variables it resolves against.
#[derive(Debug, Clone, Copy)]
pub struct BoundSetting<'a> {
    pub binding: &'a ConfigBinding,
    pub setting: &'a ConfigSetting,
    pub variables: &'a ConfigVariables,
}

impl<'a> BoundSetting<'a> {
    pub fn name(&self) -> Option<String> {
        self.setting.name(self.variables)
    }

    pub fn label(&self) -> Option<String> {
        self.setting.label(self.variables)
    }

    pub fn help(&self) -> Option<String> {
        self.setting.help(self.variables)
    }

    pub fn default_value(&self) -> Option<String> {
        self.setting.default_value(self.variables)
    }

    pub fn value_type(&self) -> ValueType {
        self.setting.value_type()
    }

    pub fn resource_type(&self) -> Option<ResourceType> {
        self.setting.resource_type()
    }

    pub fn enums(&self) -> Vec<EnumValue> {
        self.setting.enums()
    }

    pub fn validate(&self, value: Option<&str>) -> Option<String> {
        self.setting.validate_setting(value, self.variables)
    }
}

/// User interaction needed while picking and configuring a template.
///
/// Every method may fail with [`TemplateError::Cancelled`](crate::TemplateError::Cancelled)
/// when the user backs out.
pub trait TemplatePrompter {
    /// Tell the user that `query` matched no templates.
    fn warn_no_templates(&mut self, query: &TemplateQuery);

    fn select_language(&mut self, current: ProjectLanguage) -> TemplateResult<ProjectLanguage>;

    fn select_runtime(&mut self, current: ProjectRuntime) -> TemplateResult<ProjectRuntime>;

    fn select_filter(&mut self, current: TemplateFilter) -> TemplateResult<TemplateFilter>;

    /// Ask for the value of one binding setting.
    fn prompt_setting(&mut self, setting: &BoundSetting<'_>) -> TemplateResult<Value>;
}
