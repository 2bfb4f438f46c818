//! Container registry browser.
//!
//! Lists the repositories of the private Docker registry with their tags, as
//! exposed by the registry API microservice (`/repository/getAll`).

use serde::{Deserialize, Serialize};

use crate::errors::WidgetError;
use crate::http::fetch_json;

pub const DEFAULT_REGISTRY_API_URL: &str = "https://api.nasqueron.org/docker/registry";

/// A repository of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// An image tag and the digest it points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub hash: String,
}

/// Placeholder shown while the registry is queried.
pub fn loading_message(api_url: &str) -> String {
    format!("Querying {}…", api_url)
}

/// Render repositories as a heading each, followed by one line per tag.
pub fn render_repositories(repositories: &[Repository]) -> String {
    let mut output = String::new();
    for repository in repositories {
        output.push_str(&format!("<h3>{}</h3>", repository.name));
        for tag in &repository.tags {
            output.push_str(&format!(
                "<p><strong>{}</strong> — {}</p>",
                tag.name, tag.hash
            ));
        }
    }
    output
}

/// Client for the registry API.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    api_url: String,
    http: reqwest::Client,
}

impl RegistryClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_http_client(api_url, reqwest::Client::new())
    }

    pub fn with_http_client(api_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch every repository with its tags.
    pub async fn get_all_repositories(&self) -> Result<Vec<Repository>, WidgetError> {
        let url = format!("{}/repository/getAll", self.api_url);
        let repositories: Vec<Repository> = fetch_json(&self.http, &url).await?;
        tracing::info!(count = repositories.len(), "registry repositories fetched");
        Ok(repositories)
    }
}
