//! Show command - Show a template and the settings it prompts for.

use anyhow::{anyhow, Result};
use clap::Args;

use azfunc_templates::{BoundSetting, ProjectRuntime};

use super::{load_catalog, CatalogArgs};

#[derive(Args)]
pub struct ShowArgs {
    /// Template id, e.g. HttpTrigger-JavaScript
    pub template: String,

    /// Functions runtime: ~1, ~2 or beta
    #[arg(short, long, default_value = "~1")]
    pub runtime: ProjectRuntime,
}

pub async fn execute(args: ShowArgs, catalog: &CatalogArgs) -> Result<()> {
    let loaded = load_catalog(catalog).await?;
    let data = &loaded.data;

    let runtime_catalog = data
        .catalog(args.runtime)
        .ok_or_else(|| anyhow!("No templates loaded for runtime {}", args.runtime))?;
    let template = data
        .template(args.runtime, &args.template)
        .ok_or_else(|| anyhow!("Template not found: {}", args.template))?;
    let resources = runtime_catalog.resources();

    println!("📄 {}", template.id());
    if let Some(name) = template.name(resources) {
        println!("Name:        {}", name);
    }
    if let Some(description) = template.description(resources) {
        println!("Description: {}", description);
    }
    println!("Language:    {}", template.language());
    println!("Categories:  {}", template.categories().join(", "));
    println!("Default:     {}", template.default_function_name());

    let Some(trigger) = template.function_config().in_binding_type() else {
        println!("Trigger:     none");
        return Ok(());
    };
    println!("Trigger:     {}", trigger);

    if template.user_prompted_settings().is_empty() {
        return Ok(());
    }

    println!("\nSettings:");
    for name in template.user_prompted_settings() {
        match data.get_setting(args.runtime, trigger, name) {
            Some(setting) => println!("  {}", describe_setting(&setting)),
            None => println!("  {} (undeclared)", name),
        }
    }

    Ok(())
}

fn describe_setting(setting: &BoundSetting<'_>) -> String {
    let mut line = format!(
        "{} ({:?})",
        setting.name().unwrap_or_default(),
        setting.value_type()
    );

    if let Some(label) = setting.label() {
        line.push_str(&format!(": {}", label));
    }
    if let Some(default) = setting.default_value() {
        line.push_str(&format!(" [default: {}]", default));
    }

    let choices: Vec<String> = setting
        .enums()
        .iter()
        .filter_map(|e| e.value(setting.variables))
        .collect();
    if !choices.is_empty() {
        line.push_str(&format!(" {{{}}}", choices.join("|")));
    }

    line
}
