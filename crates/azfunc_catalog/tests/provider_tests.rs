//! Integration tests for loading catalogs from portal, cache, and backup.

use azfunc_catalog::{
    BackupSource, CatalogDocument, CatalogError, CatalogResult, CatalogSource, FileGlobalState,
    GlobalState, PortalClient, RawCatalog, TemplateProvider, DEFAULT_USER_AGENT,
};
use azfunc_templates::{
    ProjectLanguage, ProjectRuntime, TemplateError, TemplateFilter, VERIFIED_CSHARP_TEMPLATES,
    VERIFIED_TEMPLATES,
};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn template(id: &str) -> Value {
    let language = if id.ends_with("-CSharp") { "C#" } else { "JavaScript" };
    json!({
        "id": id,
        "function": { "bindings": [{ "name": "req", "type": "httpTrigger", "direction": "in" }] },
        "metadata": {
            "defaultFunctionName": "Function1",
            "name": id,
            "language": language,
            "category": ["$temp_category_core"]
        },
        "files": {}
    })
}

fn raw_catalog(extra: &[&str]) -> RawCatalog {
    let templates: Vec<Value> = VERIFIED_TEMPLATES
        .iter()
        .chain(VERIFIED_CSHARP_TEMPLATES)
        .chain(extra)
        .map(|id| template(id))
        .collect();

    RawCatalog {
        resources: json!({ "en": { "authLevel_label": "Authorization level" } }),
        templates: Value::Array(templates),
        config: json!({
            "variables": {},
            "bindings": [{
                "type": "httpTrigger",
                "settings": [{ "name": "authLevel", "value": "enum", "label": "$authLevel_label" }]
            }]
        }),
    }
}

async fn mount_runtime(server: &MockServer, runtime: ProjectRuntime, raw: &RawCatalog) {
    for document in CatalogDocument::all() {
        // The portal double-encodes its JSON bodies.
        let body = serde_json::to_string(&raw.get(document).to_string()).unwrap();
        Mock::given(method("GET"))
            .and(path(format!("/api/{}", document.api_name())))
            .and(query_param("runtime", runtime.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }
}

struct Fixture {
    _temp: TempDir,
    state_path: std::path::PathBuf,
    backup: BackupSource,
}

impl Fixture {
    fn new() -> Self {
        let temp = tempdir().unwrap();
        let state_path = temp.path().join("state.json");
        let backup = BackupSource::new(temp.path().join("install"));
        Self {
            _temp: temp,
            state_path,
            backup,
        }
    }

    fn provider(&self, portal_url: &str) -> TemplateProvider<FileGlobalState> {
        TemplateProvider::new(
            PortalClient::new(portal_url, DEFAULT_USER_AGENT),
            FileGlobalState::open(&self.state_path),
            self.backup.clone(),
        )
    }
}

#[tokio::test]
async fn test_load_from_portal_populates_cache() {
    let server = MockServer::start().await;
    let fixture = Fixture::new();
    for runtime in ProjectRuntime::all() {
        mount_runtime(&server, runtime, &raw_catalog(&["EventHubTrigger-JavaScript"])).await;
    }

    let mut provider = fixture.provider(&server.uri());
    let loaded = provider.load().await.unwrap();

    assert_eq!(loaded.runtimes.len(), 3);
    assert!(loaded.runtimes.iter().all(|r| r.source == CatalogSource::Portal));
    assert_eq!(loaded.data.all_templates(ProjectRuntime::Beta).len(), 13);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 9);
    assert!(requests.iter().all(|r| {
        r.headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            == Some(DEFAULT_USER_AGENT)
    }));

    let state = FileGlobalState::open(&fixture.state_path);
    assert!(state.get("FunctionTemplates").is_some());
    assert!(state.get("FunctionTemplateConfig.beta").is_some());
    assert!(state.get("FunctionTemplateResources.~2").is_some());
}

#[tokio::test]
async fn test_portal_failure_falls_back_to_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fixture = Fixture::new();
    let mut state = FileGlobalState::open(&fixture.state_path);
    for runtime in [ProjectRuntime::V1, ProjectRuntime::Beta] {
        let raw = raw_catalog(&[]);
        for document in CatalogDocument::all() {
            state
                .update(&document.cache_key(runtime), raw.get(document).clone())
                .unwrap();
        }
    }

    let mut provider = fixture.provider(&server.uri());
    let loaded = provider.load().await.unwrap();

    let sources: Vec<_> = loaded.runtimes.iter().map(|r| (r.runtime, r.source)).collect();
    assert_eq!(
        sources,
        vec![
            (ProjectRuntime::V1, CatalogSource::Cache),
            (ProjectRuntime::Beta, CatalogSource::Cache),
        ]
    );
    assert!(loaded.data.catalog(ProjectRuntime::V2).is_none());
}

#[tokio::test]
async fn test_offline_uses_backup_and_reports_skipped() {
    let fixture = Fixture::new();
    let mut raw = raw_catalog(&[]);
    raw.templates
        .as_array_mut()
        .unwrap()
        .push(json!({ "id": "Broken-JavaScript" }));
    fixture.backup.write(ProjectRuntime::V1, &raw).unwrap();
    fixture.backup.write(ProjectRuntime::Beta, &raw_catalog(&[])).unwrap();

    // Nothing listens on this port; offline mode must not try it.
    let mut provider = fixture.provider("http://127.0.0.1:9").offline(true);
    let loaded = provider.load().await.unwrap();

    let v1 = &loaded.runtimes[0];
    assert_eq!(v1.runtime, ProjectRuntime::V1);
    assert_eq!(v1.source, CatalogSource::Backup);
    assert_eq!(v1.template_count, 12);
    assert_eq!(v1.skipped.len(), 1);
    assert_eq!(v1.skipped[0].id.as_deref(), Some("Broken-JavaScript"));

    let java = loaded
        .data
        .filter_templates(ProjectLanguage::Java, ProjectRuntime::V1, TemplateFilter::Verified);
    assert_eq!(java.len(), 4);
}

#[tokio::test]
async fn test_no_sources_is_fatal() {
    let fixture = Fixture::new();
    let mut provider = fixture.provider("http://127.0.0.1:9").offline(true);

    let result = provider.load().await;
    assert!(matches!(
        result,
        Err(CatalogError::Template(TemplateError::MissingVerifiedTemplates { .. }))
    ));
}

#[tokio::test]
async fn test_unparseable_portal_catalog_is_not_cached() {
    let server = MockServer::start().await;
    let mut raw = raw_catalog(&[]);
    raw.templates = json!({ "not": "an array" });
    mount_runtime(&server, ProjectRuntime::V1, &raw).await;

    let fixture = Fixture::new();
    let mut provider = fixture.provider(&server.uri());

    assert!(provider.try_from_portal(ProjectRuntime::V1).await.is_err());
    assert!(provider.state().get("FunctionTemplates").is_none());
}

#[tokio::test]
async fn test_refresh_cache() {
    let server = MockServer::start().await;
    mount_runtime(&server, ProjectRuntime::Beta, &raw_catalog(&[])).await;

    let fixture = Fixture::new();
    let mut provider = fixture.provider(&server.uri());
    let refreshed = provider.refresh_cache().await;

    assert_eq!(refreshed, vec![ProjectRuntime::Beta]);
    assert!(provider.try_from_cache(ProjectRuntime::Beta).is_ok());
    assert!(matches!(
        provider.try_from_cache(ProjectRuntime::V1),
        Err(CatalogError::CacheMiss { .. })
    ));
}

/// A cache that can be read but never written.
struct ReadOnlyState;

impl GlobalState for ReadOnlyState {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn update(&mut self, _key: &str, _value: Value) -> CatalogResult<()> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
    }
}

#[tokio::test]
async fn test_portal_catalog_survives_cache_write_failure() {
    let server = MockServer::start().await;
    mount_runtime(&server, ProjectRuntime::V1, &raw_catalog(&[])).await;

    let fixture = Fixture::new();
    let mut provider = TemplateProvider::new(
        PortalClient::new(server.uri(), DEFAULT_USER_AGENT),
        ReadOnlyState,
        fixture.backup.clone(),
    );

    let (source, parsed) = provider.load_runtime(ProjectRuntime::V1).await.unwrap();
    assert_eq!(source, CatalogSource::Portal);
    assert_eq!(parsed.templates.len(), 12);

    // Refreshing has nothing to show for an unwritable cache.
    assert!(provider.refresh_cache().await.is_empty());
}
