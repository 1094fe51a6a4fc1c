//! List command - List the templates matching a language, runtime, and filter.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use azfunc_templates::{
    JsonWorkspaceSettings, ProjectRuntime, Template, TemplateCategory, TemplateData,
};

use super::{load_catalog, CatalogArgs, QueryArgs};
use crate::prompter::InquirePrompter;

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Project whose settings provide defaults
    #[arg(short, long, default_value = ".")]
    pub project: PathBuf,

    /// Prompt for another language, runtime, or filter when nothing matches
    #[arg(short, long)]
    pub interactive: bool,
}

pub async fn execute(args: ListArgs, catalog: &CatalogArgs) -> Result<()> {
    let loaded = load_catalog(catalog).await?;
    let mut settings = JsonWorkspaceSettings::new();
    let query = args.query.resolve(&settings, &args.project);
    info!("Listing templates for {:?}", query);

    let (query, templates) = if args.interactive {
        let mut prompter = InquirePrompter::new();
        let selection = loaded
            .data
            .get_templates(&mut prompter, &mut settings, &args.project, query)
            .context("Failed to find templates")?;
        (selection.query, selection.templates)
    } else {
        let templates = loaded
            .data
            .filter_templates(query.language, query.runtime, query.filter);
        (query, templates)
    };

    if templates.is_empty() {
        println!(
            "⚠️  No templates found for language {}, runtime {}, filter {}",
            query.language, query.runtime, query.filter
        );
        return Ok(());
    }

    println!(
        "📦 {} template(s) for {} on runtime {} ({}):\n",
        templates.len(),
        query.language,
        query.runtime,
        query.filter
    );
    for template in templates {
        println!("  {}", describe(&loaded.data, query.runtime, template));
    }

    Ok(())
}

fn describe(data: &TemplateData, runtime: ProjectRuntime, template: &Template) -> String {
    let name = data
        .catalog(runtime)
        .and_then(|catalog| template.name(catalog.resources()))
        .unwrap_or_else(|| template.id().to_string());
    let core = if template.is_category(TemplateCategory::CORE) {
        " [core]"
    } else {
        ""
    };

    format!("{:<45} {}{}", template.id(), name, core)
}
