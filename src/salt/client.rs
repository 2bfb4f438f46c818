use serde_json::Value;

use super::servers::{Server, ServerList};
use crate::errors::WidgetError;
use crate::http::fetch_json;

pub const DEFAULT_SERVERS_API_URL: &str = "https://api.nasqueron.org/infra/servers.json";

/// Path where each server publishes the states Salt applies to it.
const STATES_PATH: &str = "/datasources/infra/all-states.json";

/// Client for the servers API and the per-server states datasource.
#[derive(Debug, Clone)]
pub struct SaltClient {
    servers_api_url: String,
    states_scheme: String,
    http: reqwest::Client,
}

impl SaltClient {
    pub fn new(servers_api_url: impl Into<String>) -> Self {
        Self::with_http_client(servers_api_url, reqwest::Client::new())
    }

    pub fn with_http_client(servers_api_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            servers_api_url: servers_api_url.into(),
            states_scheme: "https".to_string(),
            http,
        }
    }

    /// Fetch states over another scheme than https (local test servers).
    pub fn with_states_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.states_scheme = scheme.into();
        self
    }

    pub fn servers_api_url(&self) -> &str {
        &self.servers_api_url
    }

    pub fn states_url(&self, hostname: &str) -> String {
        format!("{}://{}{}", self.states_scheme, hostname, STATES_PATH)
    }

    pub async fn fetch_servers(&self) -> Result<ServerList, WidgetError> {
        let servers: ServerList = fetch_json(&self.http, &self.servers_api_url).await?;
        tracing::info!(count = servers.len(), "servers fetched");
        Ok(servers)
    }

    pub async fn fetch_states(&self, hostname: &str) -> Result<Value, WidgetError> {
        fetch_json(&self.http, &self.states_url(hostname)).await
    }

    /// Drill down from the servers list to one server's states.
    pub async fn fetch_server_states(&self, id: &str) -> Result<(Server, Value), WidgetError> {
        let servers = self.fetch_servers().await?;
        let server = servers
            .find(id)
            .cloned()
            .ok_or_else(|| WidgetError::ServerNotFound { id: id.to_string() })?;

        tracing::debug!(id, hostname = %server.hostname, "fetching server states");
        let states = self.fetch_states(&server.hostname).await?;
        Ok((server, states))
    }
}
