//! Terminal prompts for template selection and binding settings.

use std::fmt;

use inquire::{Confirm, InquireError, MultiSelect, Select, Text};
use serde_json::Value;

use azfunc_templates::{
    BoundSetting, ProjectLanguage, ProjectRuntime, TemplateError, TemplateFilter,
    TemplatePrompter, TemplateQuery, TemplateResult, ValueType,
};

/// An enum or check box choice shown by its display name.
#[derive(Debug, Clone, PartialEq)]
struct Choice {
    value: String,
    display: String,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// [`TemplatePrompter`] backed by `inquire`.
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl InquirePrompter {
    pub fn new() -> Self {
        Self
    }
}

pub fn map_prompt_error(error: InquireError) -> TemplateError {
    match error {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            TemplateError::Cancelled
        }
        other => TemplateError::Prompt(other.to_string()),
    }
}

fn select_current<T: Copy + PartialEq + fmt::Display>(
    message: &str,
    options: Vec<T>,
    current: T,
) -> TemplateResult<T> {
    let cursor = options.iter().position(|o| *o == current).unwrap_or(0);
    Select::new(message, options)
        .with_starting_cursor(cursor)
        .prompt()
        .map_err(map_prompt_error)
}

impl TemplatePrompter for InquirePrompter {
    fn warn_no_templates(&mut self, query: &TemplateQuery) {
        eprintln!(
            "⚠️  No templates found matching language \"{}\", runtime \"{}\", and filter \"{}\".",
            query.language, query.runtime, query.filter
        );
    }

    fn select_language(&mut self, current: ProjectLanguage) -> TemplateResult<ProjectLanguage> {
        select_current("Select a language", ProjectLanguage::all(), current)
    }

    fn select_runtime(&mut self, current: ProjectRuntime) -> TemplateResult<ProjectRuntime> {
        select_current("Select a runtime", ProjectRuntime::all(), current)
    }

    fn select_filter(&mut self, current: TemplateFilter) -> TemplateResult<TemplateFilter> {
        select_current("Select a template filter", TemplateFilter::all(), current)
    }

    fn prompt_setting(&mut self, setting: &BoundSetting<'_>) -> TemplateResult<Value> {
        let label = setting
            .label()
            .or_else(|| setting.name())
            .unwrap_or_else(|| "Value".to_string());
        let default = setting.default_value();

        match setting.value_type() {
            ValueType::Boolean => {
                let default = default.as_deref().map(|d| d.eq_ignore_ascii_case("true"));
                let answer = Confirm::new(&label)
                    .with_default(default.unwrap_or(false))
                    .prompt()
                    .map_err(map_prompt_error)?;
                Ok(text_answer(answer))
            }
            ValueType::Enum => {
                let choices = choices(setting);
                let cursor = default
                    .as_deref()
                    .and_then(|d| choices.iter().position(|c| c.value == d))
                    .unwrap_or(0);
                let choice = Select::new(&label, choices)
                    .with_starting_cursor(cursor)
                    .prompt()
                    .map_err(map_prompt_error)?;
                Ok(Value::String(choice.value))
            }
            ValueType::CheckBoxList => {
                let picked = MultiSelect::new(&label, choices(setting))
                    .prompt()
                    .map_err(map_prompt_error)?;
                Ok(Value::Array(
                    picked.into_iter().map(|c| Value::String(c.value)).collect(),
                ))
            }
            ValueType::Int => loop {
                let input = prompt_text(setting, &label, default.as_deref())?;
                match input.trim().parse::<i64>() {
                    Ok(number) => return Ok(text_answer(number)),
                    Err(_) => eprintln!("❌ '{}' is not a whole number", input),
                }
            },
            ValueType::String | ValueType::Unknown => {
                prompt_text(setting, &label, default.as_deref()).map(Value::String)
            }
        }
    }
}

/// Answers land in function.json as strings, whatever the setting's type.
fn text_answer(value: impl ToString) -> Value {
    Value::String(value.to_string())
}

fn choices(setting: &BoundSetting<'_>) -> Vec<Choice> {
    setting
        .enums()
        .iter()
        .map(|e| {
            let value = e.value(setting.variables).unwrap_or_default();
            let display = e
                .display_name(setting.variables)
                .unwrap_or_else(|| value.clone());
            Choice { value, display }
        })
        .collect()
}

/// Ask for text until the setting's validators accept it.
fn prompt_text(
    setting: &BoundSetting<'_>,
    label: &str,
    default: Option<&str>,
) -> TemplateResult<String> {
    let help = setting.help();
    let mut initial = default.map(str::to_string);

    loop {
        let mut text = Text::new(label);
        if let Some(value) = initial.as_deref() {
            text = text.with_initial_value(value);
        }
        if let Some(help) = help.as_deref() {
            text = text.with_help_message(help);
        }

        let input = text.prompt().map_err(map_prompt_error)?;
        match setting.validate(Some(&input)) {
            None => return Ok(input),
            Some(message) => {
                eprintln!("❌ {}", message);
                initial = Some(input);
            }
        }
    }
}
