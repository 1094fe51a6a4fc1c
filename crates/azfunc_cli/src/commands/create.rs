//! Create command - Create a function in a project from a template.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Args;
use inquire::{Select, Text};
use tracing::info;

use azfunc_templates::settings::{
    project_language, project_runtime, PROJECT_LANGUAGE_SETTING, PROJECT_RUNTIME_SETTING,
};
use azfunc_templates::{
    unique_function_name, validate_function_name, write_function, JsonWorkspaceSettings,
    Resources, Template, TemplatePrompter, WorkspaceSettings,
};

use super::{load_catalog, CatalogArgs, QueryArgs};
use crate::prompter::{map_prompt_error, InquirePrompter};

#[derive(Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Function project directory
    #[arg(short, long, default_value = ".")]
    pub project: PathBuf,

    /// Template id (prompted for when omitted)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Function name (prompted for when omitted)
    #[arg(short, long)]
    pub name: Option<String>,
}

/// A template shown by its resolved display name.
struct TemplateChoice<'a> {
    template: &'a Template,
    name: String,
}

impl fmt::Display for TemplateChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub async fn execute(args: CreateArgs, catalog: &CatalogArgs) -> Result<()> {
    let project = args.project;
    if !project.is_dir() {
        anyhow::bail!("Project directory not found: {:?}", project);
    }

    let loaded = load_catalog(catalog).await?;
    let mut settings = JsonWorkspaceSettings::new();
    let mut prompter = InquirePrompter::new();

    // A project without a language or runtime gets one chosen and saved.
    let mut query = args.query.resolve(&settings, &project);
    if args.query.language.is_none() && project_language(&settings, &project).is_none() {
        query.language = prompter.select_language(query.language)?;
        settings.update(&project, PROJECT_LANGUAGE_SETTING, query.language.as_str())?;
    }
    if args.query.runtime.is_none() && project_runtime(&settings, &project).is_none() {
        query.runtime = prompter.select_runtime(query.runtime)?;
        settings.update(&project, PROJECT_RUNTIME_SETTING, query.runtime.as_str())?;
    }

    let selection = loaded
        .data
        .get_templates(&mut prompter, &mut settings, &project, query)
        .context("Failed to find templates")?;
    let runtime = selection.query.runtime;
    let resources = loaded
        .data
        .catalog(runtime)
        .map(|c| c.resources())
        .ok_or_else(|| anyhow!("No templates loaded for runtime {}", runtime))?;

    let template = match &args.template {
        Some(id) => selection
            .templates
            .iter()
            .copied()
            .find(|t| t.id() == id)
            .ok_or_else(|| anyhow!("Template not found for {:?}: {}", selection.query, id))?,
        None => select_template(&selection.templates, resources)?,
    };
    info!("Using template {}", template.id());

    let function_name = match args.name {
        Some(name) => {
            if let Some(message) = validate_function_name(&project, &name) {
                anyhow::bail!("Invalid function name argument: {}", message);
            }
            name
        }
        None => prompt_function_name(&project, template)?,
    };

    let answers = loaded
        .data
        .collect_settings(runtime, template, &mut prompter)
        .context("Failed to collect template settings")?;
    let function = template
        .materialize(&answers)
        .context("Failed to apply template settings")?;
    let written = write_function(&project, &function_name, &function)
        .context("Failed to write function")?;

    println!("✅ Function '{}' created from {}", function_name, template.id());
    println!();
    for path in written {
        println!("  {}", path.display());
    }

    Ok(())
}

fn select_template<'a>(templates: &[&'a Template], resources: &Resources) -> Result<&'a Template> {
    let choices: Vec<TemplateChoice<'a>> = templates
        .iter()
        .map(|&template| TemplateChoice {
            template,
            name: template
                .name(resources)
                .unwrap_or_else(|| template.id().to_string()),
        })
        .collect();

    let choice = Select::new("📦 Select a function template", choices)
        .prompt()
        .map_err(map_prompt_error)?;
    Ok(choice.template)
}

fn prompt_function_name(project: &Path, template: &Template) -> Result<String> {
    let default = unique_function_name(project, template.default_function_name());

    loop {
        let name = Text::new("Provide a function name")
            .with_initial_value(&default)
            .prompt()
            .map_err(map_prompt_error)?;

        match validate_function_name(project, name.trim()) {
            None => return Ok(name.trim().to_string()),
            Some(message) => eprintln!("❌ {}", message),
        }
    }
}
