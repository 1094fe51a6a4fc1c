//! The template catalog of every runtime, and template selection over it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{TemplateError, TemplateResult};
use crate::function_config::SettingAnswers;
use crate::language::{ProjectLanguage, ProjectRuntime, TemplateCategory, TemplateFilter};
use crate::loader::ParsedCatalog;
use crate::prompt::{BoundSetting, TemplatePrompter, TemplateQuery};
use crate::resources::Resources;
use crate::settings::{
    WorkspaceSettings, PROJECT_LANGUAGE_SETTING, PROJECT_RUNTIME_SETTING, TEMPLATE_FILTER_SETTING,
};
use crate::template::{remove_language_from_id, Template};

/// JavaScript templates known to work end to end.
pub const VERIFIED_TEMPLATES: &[&str] = &[
    "BlobTrigger-JavaScript",
    "GenericWebHook-JavaScript",
    "GitHubWebHook-JavaScript",
    "HttpTrigger-JavaScript",
    "HttpTriggerWithParameters-JavaScript",
    "ManualTrigger-JavaScript",
    "QueueTrigger-JavaScript",
    "TimerTrigger-JavaScript",
];

/// The only C# templates offered, whatever the filter.
pub const VERIFIED_CSHARP_TEMPLATES: &[&str] = &[
    "HttpTrigger-CSharp",
    "BlobTrigger-CSharp",
    "QueueTrigger-CSharp",
    "TimerTrigger-CSharp",
];

/// Java reuses these JavaScript templates, matched without language suffix.
pub const JAVA_TEMPLATES: &[&str] = &["HttpTrigger", "BlobTrigger", "QueueTrigger", "TimerTrigger"];

/// How many times an empty template query is re-prompted before giving up.
pub const MAX_TEMPLATE_QUERY_ATTEMPTS: usize = 5;

/// Templates, config, and resources of one runtime.
#[derive(Debug, Clone)]
pub struct RuntimeCatalog {
    resources: Arc<Resources>,
    templates: Vec<Template>,
    config: Config,
}

impl RuntimeCatalog {
    pub fn new(resources: Arc<Resources>, templates: Vec<Template>, config: Config) -> Self {
        Self {
            resources,
            templates,
            config,
        }
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn contains(&self, id: &str) -> bool {
        self.templates.iter().any(|t| t.id() == id)
    }
}

impl From<ParsedCatalog> for RuntimeCatalog {
    fn from(parsed: ParsedCatalog) -> Self {
        Self::new(parsed.resources, parsed.templates, parsed.config)
    }
}

/// Templates selected for a query, with the query that produced them (which
/// differs from the requested one when the user was re-prompted).
#[derive(Debug, Clone)]
pub struct TemplateSelection<'a> {
    pub query: TemplateQuery,
    pub templates: Vec<&'a Template>,
}

enum QueryState<'a> {
    Filtering(TemplateQuery),
    AwaitingUserChoice(TemplateQuery),
    Resolved(TemplateSelection<'a>),
    Cancelled,
}

/// The loaded template catalog, read-only once built.
#[derive(Debug, Clone)]
pub struct TemplateData {
    catalogs: HashMap<ProjectRuntime, RuntimeCatalog>,
}

impl TemplateData {
    /// Build the catalog, checking that the verified templates are present.
    ///
    /// Every [`VERIFIED_TEMPLATES`] id must exist for `~1`, and every
    /// [`VERIFIED_CSHARP_TEMPLATES`] id for both `~1` and `beta`.
    pub fn new(catalogs: HashMap<ProjectRuntime, RuntimeCatalog>) -> TemplateResult<Self> {
        Self::ensure_verified(&catalogs, ProjectRuntime::V1, VERIFIED_TEMPLATES)?;
        for runtime in [ProjectRuntime::V1, ProjectRuntime::Beta] {
            Self::ensure_verified(&catalogs, runtime, VERIFIED_CSHARP_TEMPLATES)?;
        }

        info!(
            "Loaded template catalog for {} runtime(s)",
            catalogs.len()
        );
        Ok(Self { catalogs })
    }

    fn ensure_verified(
        catalogs: &HashMap<ProjectRuntime, RuntimeCatalog>,
        runtime: ProjectRuntime,
        ids: &[&str],
    ) -> TemplateResult<()> {
        let missing: Vec<&str> = match catalogs.get(&runtime) {
            Some(catalog) => ids.iter().copied().filter(|id| !catalog.contains(id)).collect(),
            None => ids.to_vec(),
        };

        if missing.is_empty() {
            Ok(())
        } else {
            Err(TemplateError::MissingVerifiedTemplates {
                runtime: runtime.to_string(),
                ids: missing.join(", "),
            })
        }
    }

    pub fn runtimes(&self) -> Vec<ProjectRuntime> {
        ProjectRuntime::all()
            .into_iter()
            .filter(|runtime| self.catalogs.contains_key(runtime))
            .collect()
    }

    pub fn catalog(&self, runtime: ProjectRuntime) -> Option<&RuntimeCatalog> {
        self.catalogs.get(&runtime)
    }

    /// Every template of a runtime, unfiltered.
    pub fn all_templates(&self, runtime: ProjectRuntime) -> &[Template] {
        self.catalogs
            .get(&runtime)
            .map(RuntimeCatalog::templates)
            .unwrap_or_default()
    }

    /// Find a template by id.
    pub fn template(&self, runtime: ProjectRuntime, id: &str) -> Option<&Template> {
        self.all_templates(runtime).iter().find(|t| t.id() == id)
    }

    /// Templates of `runtime` offered for `language` under `filter`.
    ///
    /// Java borrows JavaScript templates; C# always gets its verified set and
    /// ignores `filter`.
    pub fn filter_templates(
        &self,
        language: ProjectLanguage,
        runtime: ProjectRuntime,
        filter: TemplateFilter,
    ) -> Vec<&Template> {
        let templates = self.all_templates(runtime).iter();

        match language {
            ProjectLanguage::Java => templates
                .filter(|t| t.language() == ProjectLanguage::JavaScript.as_str())
                .filter(|t| JAVA_TEMPLATES.contains(&remove_language_from_id(t.id())))
                .collect(),
            ProjectLanguage::CSharp => templates
                .filter(|t| VERIFIED_CSHARP_TEMPLATES.contains(&t.id()))
                .collect(),
            _ => {
                let catalog_language = language.catalog_name();
                let matching = templates
                    .filter(|t| t.language().eq_ignore_ascii_case(catalog_language));

                match filter {
                    TemplateFilter::All => matching.collect(),
                    TemplateFilter::Core => matching
                        .filter(|t| t.is_category(TemplateCategory::CORE))
                        .collect(),
                    TemplateFilter::Verified => matching
                        .filter(|t| VERIFIED_TEMPLATES.contains(&t.id()))
                        .collect(),
                }
            }
        }
    }

    /// Templates for `query`, re-prompting the user while nothing matches.
    ///
    /// Java and C# queries never re-prompt; they resolve to their fixed
    /// template set even when it is empty for the runtime.
    ///
    /// Each re-prompt asks for language, runtime, and filter and saves the
    /// answers to `settings` for `project_path`. Gives up with
    /// [`TemplateError::NoMatchingTemplates`] after
    /// [`MAX_TEMPLATE_QUERY_ATTEMPTS`] empty results; a cancelled prompt
    /// yields [`TemplateError::Cancelled`].
    pub fn get_templates<'a>(
        &'a self,
        prompter: &mut dyn TemplatePrompter,
        settings: &mut dyn WorkspaceSettings,
        project_path: &Path,
        query: TemplateQuery,
    ) -> TemplateResult<TemplateSelection<'a>> {
        let mut attempts = 0;
        let mut state = QueryState::Filtering(query);

        loop {
            state = match state {
                QueryState::Filtering(query) => {
                    let templates = self.filter_templates(query.language, query.runtime, query.filter);
                    // Java and C# offer a fixed set; an empty one is a valid answer.
                    let fixed_set =
                        matches!(query.language, ProjectLanguage::Java | ProjectLanguage::CSharp);
                    if !templates.is_empty() || fixed_set {
                        QueryState::Resolved(TemplateSelection { query, templates })
                    } else {
                        attempts += 1;
                        debug!("No templates for {:?} (attempt {})", query, attempts);
                        if attempts >= MAX_TEMPLATE_QUERY_ATTEMPTS {
                            return Err(TemplateError::NoMatchingTemplates {
                                language: query.language.to_string(),
                                runtime: query.runtime.to_string(),
                                filter: query.filter.to_string(),
                            });
                        }
                        QueryState::AwaitingUserChoice(query)
                    }
                }
                QueryState::AwaitingUserChoice(query) => {
                    match Self::reprompt(prompter, settings, project_path, &query) {
                        Ok(next) => QueryState::Filtering(next),
                        Err(TemplateError::Cancelled) => QueryState::Cancelled,
                        Err(e) => return Err(e),
                    }
                }
                QueryState::Resolved(selection) => return Ok(selection),
                QueryState::Cancelled => return Err(TemplateError::Cancelled),
            };
        }
    }

    fn reprompt(
        prompter: &mut dyn TemplatePrompter,
        settings: &mut dyn WorkspaceSettings,
        project_path: &Path,
        query: &TemplateQuery,
    ) -> TemplateResult<TemplateQuery> {
        prompter.warn_no_templates(query);

        let language = prompter.select_language(query.language)?;
        settings.update(project_path, PROJECT_LANGUAGE_SETTING, language.as_str())?;

        let runtime = prompter.select_runtime(query.runtime)?;
        settings.update(project_path, PROJECT_RUNTIME_SETTING, runtime.as_str())?;

        let filter = prompter.select_filter(query.filter)?;
        settings.update(project_path, TEMPLATE_FILTER_SETTING, filter.as_str())?;

        Ok(TemplateQuery::new(language, runtime, filter))
    }

    /// Look up a setting of a binding type; `None` when either is unknown.
    pub fn get_setting(
        &self,
        runtime: ProjectRuntime,
        binding_type: &str,
        setting_name: &str,
    ) -> Option<BoundSetting<'_>> {
        let config = self.catalogs.get(&runtime)?.config();
        let variables = config.variables();
        let binding = config.binding(binding_type)?;
        let setting = binding.setting(setting_name, variables)?;

        Some(BoundSetting {
            binding,
            setting,
            variables,
        })
    }

    /// Prompt for each of the template's user-prompted settings, in order.
    ///
    /// Settings without a declaration for the template's trigger type are
    /// skipped.
    pub fn collect_settings(
        &self,
        runtime: ProjectRuntime,
        template: &Template,
        prompter: &mut dyn TemplatePrompter,
    ) -> TemplateResult<SettingAnswers> {
        let mut answers = SettingAnswers::new();
        let Some(binding_type) = template.function_config().in_binding_type() else {
            if !template.user_prompted_settings().is_empty() {
                warn!("Template {} has prompts but no trigger binding", template.id());
            }
            return Ok(answers);
        };

        for name in template.user_prompted_settings() {
            match self.get_setting(runtime, binding_type, name) {
                Some(setting) => {
                    let value = prompter.prompt_setting(&setting)?;
                    answers.insert(name.clone(), value);
                }
                None => debug!("No setting {} declared for {}", name, binding_type),
            }
        }

        Ok(answers)
    }
}
