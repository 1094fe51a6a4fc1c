//! Client for the functions portal template API.

use azfunc_templates::ProjectRuntime;
use serde_json::Value;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::document::{CatalogDocument, RawCatalog};
use crate::error::{CatalogError, CatalogResult};

/// Fetches catalog documents from `{portal}/api/{document}?runtime={runtime}`.
pub struct PortalClient {
    base_url: String,
    user_agent: String,
    client: reqwest::Client,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.portal_url.clone(), config.user_agent.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one document.
    pub async fn fetch(
        &self,
        document: CatalogDocument,
        runtime: ProjectRuntime,
    ) -> CatalogResult<Value> {
        let url = format!("{}/api/{}", self.base_url, document.api_name());
        debug!("GET {}?runtime={}", url, runtime);

        let response = self
            .client
            .get(&url)
            .query(&[("runtime", runtime.as_str())])
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::PortalStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        decode_body(&body)
    }

    /// Fetch all three documents of a runtime, one after the other.
    pub async fn fetch_all(&self, runtime: ProjectRuntime) -> CatalogResult<RawCatalog> {
        let resources = self.fetch(CatalogDocument::Resources, runtime).await?;
        let templates = self.fetch(CatalogDocument::Templates, runtime).await?;
        let config = self.fetch(CatalogDocument::BindingConfig, runtime).await?;

        Ok(RawCatalog {
            resources,
            templates,
            config,
        })
    }
}

/// The portal returns JSON encoded as a JSON string; decode both layers.
/// A body that is already a document is taken as-is.
pub fn decode_body(body: &str) -> CatalogResult<Value> {
    match serde_json::from_str::<Value>(body)? {
        Value::String(inner) => Ok(serde_json::from_str(&inner)?),
        value => Ok(value),
    }
}
