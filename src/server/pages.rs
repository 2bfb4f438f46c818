use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};

use super::embedded::{Assets, escape_html, render_page};
use crate::decorator::MessageDecorator;
use crate::errors::WidgetError;
use crate::registry::{RegistryClient, render_repositories};
use crate::salt::{SaltClient, SaltLinks, StatesView, format_servers};
use crate::widgets_config::WidgetsConfig;

/// Where the servers list lives; the states views hang below it.
pub const CONFIG_ROUTE: &str = "/config";

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub decorator: MessageDecorator,
    pub registry: RegistryClient,
    pub salt: SaltClient,
    pub salt_links: SaltLinks,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn from_config(config: &WidgetsConfig) -> Self {
        let http = reqwest::Client::new();
        Self {
            decorator: MessageDecorator::new(config.link_targets()),
            registry: RegistryClient::with_http_client(config.registry_url(), http.clone()),
            salt: SaltClient::with_http_client(config.servers_url(), http),
            salt_links: config.salt_links(),
        }
    }
}

// ── Error handling ────────────────────────────────────────────────────

pub enum PageError {
    NotFound(String),
    Upstream(String),
}

impl From<WidgetError> for PageError {
    fn from(err: WidgetError) -> Self {
        match err {
            WidgetError::ServerNotFound { .. } => PageError::NotFound(err.to_string()),
            other => {
                tracing::warn!(error = %other, "widget data unavailable");
                PageError::Upstream(other.to_string())
            }
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, title, message) = match self {
            PageError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", msg),
            PageError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "Data unavailable", msg),
        };
        // Messages can carry request path segments
        let body = format!(
            r#"<h2>{}</h2><p class="config-error">{}</p>"#,
            title,
            escape_html(&message)
        );
        (status, Html(render_page(title, &body))).into_response()
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn pages_router() -> Router<SharedState> {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/registry", get(registry_page))
        .route(CONFIG_ROUTE, get(servers_page))
        .route("/config/{server}", get(server_states_page))
        .route("/decorate", post(decorate_message))
        .route("/assets/{*path}", get(asset))
}

async fn health() -> &'static str {
    "ok"
}

async fn index() -> Html<String> {
    let body = concat!(
        "<h2>Infrastructure</h2>",
        r#"<ul><li><a href="/registry">Docker registry</a></li>"#,
        r#"<li><a href="/config">Servers configuration</a></li></ul>"#,
    );
    Html(render_page("Infrastructure", body))
}

async fn registry_page(State(state): State<SharedState>) -> Result<Html<String>, PageError> {
    let repositories = state.registry.get_all_repositories().await?;
    Ok(Html(render_page(
        "Docker registry",
        &render_repositories(&repositories),
    )))
}

async fn servers_page(State(state): State<SharedState>) -> Result<Html<String>, PageError> {
    let servers = state.salt.fetch_servers().await?;
    Ok(Html(render_page(
        "Servers configuration",
        &format_servers(&servers, CONFIG_ROUTE),
    )))
}

async fn server_states_page(
    State(state): State<SharedState>,
    Path(server): Path<String>,
) -> Result<Html<String>, PageError> {
    let (_, states) = state.salt.fetch_server_states(&server).await?;
    let view = StatesView::new(state.salt_links.clone(), server.as_str());
    Ok(Html(render_page(
        view.server(),
        &view.format_config(&states, CONFIG_ROUTE),
    )))
}

/// Decorate the plain-text message posted as body.
async fn decorate_message(State(state): State<SharedState>, message: String) -> Html<String> {
    Html(state.decorator.decorate(&message))
}

async fn asset(Path(path): Path<String>) -> Response {
    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], Body::from(content.data.into_owned()))
                .into_response()
        }
        None => PageError::NotFound(format!("No asset {}", path)).into_response(),
    }
}
