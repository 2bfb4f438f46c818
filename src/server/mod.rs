//! Widget server.
//!
//! Serves each widget as a page: the fragments the renderers produce,
//! wrapped in the embedded layout.
//!
//! | Route                  | Page                                      |
//! |------------------------|-------------------------------------------|
//! | `GET /`                | index                                     |
//! | `GET /registry`        | container registry                        |
//! | `GET /config`          | Salt servers list                         |
//! | `GET /config/{server}` | states of one server, back link to list   |
//! | `POST /decorate`       | decorated log message (plain-text body)   |
//! | `GET /assets/{*path}`  | embedded stylesheet                       |

pub mod embedded;
pub mod pages;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use pages::{AppState, SharedState};

/// Configuration for the widget server.
pub struct ServerConfig {
    pub port: u16,
    pub dev_mode: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            dev_mode: false,
        }
    }
}

/// Build the full application router.
pub fn build_router(state: SharedState) -> Router {
    pages::pages_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the widget server and run until Ctrl+C.
pub async fn start_server(config: ServerConfig, state: AppState) -> Result<()> {
    let mut app = build_router(Arc::new(state));

    if config.dev_mode {
        app = app.layer(CorsLayer::permissive());
    }

    let host = if config.dev_mode { "0.0.0.0" } else { "127.0.0.1" };
    let addr = format!("{}:{}", host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    println!("Infrastructure widgets running at http://{}", local_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    println!("\nShutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::{LinkTargets, MessageDecorator};
    use crate::registry::RegistryClient;
    use crate::salt::{SaltClient, SaltLinks};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::{Json, routing::get};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    // Discard port: connections are refused
    const DEAD_UPSTREAM: &str = "http://127.0.0.1:9";

    fn test_state(upstream: &str) -> SharedState {
        Arc::new(AppState {
            decorator: MessageDecorator::new(LinkTargets {
                search_url: "https://search.test/?q=".to_string(),
                source_url: "https://source.test/".to_string(),
            }),
            registry: RegistryClient::new(upstream),
            salt: SaltClient::new(format!("{upstream}/servers.json")).with_states_scheme("http"),
            salt_links: SaltLinks::default(),
        })
    }

    /// Fake registry, servers API and states datasource on one listener.
    async fn spawn_upstream() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let servers = json!({
            "local": {
                "name": "Local",
                "description": "Test box",
                "hostname": addr.to_string(),
                "configurator": "salt"
            }
        });

        let app = Router::new()
            .route(
                "/repository/getAll",
                get(|| async {
                    Json(json!([{"name": "alpine", "tags": [{"name": "3.20", "hash": "sha256:ab"}]}]))
                }),
            )
            .route(
                "/servers.json",
                get(move || {
                    let servers = servers.clone();
                    async move { Json(servers) }
                }),
            )
            .route(
                "/datasources/infra/all-states.json",
                get(|| async {
                    Json(json!({
                        "roles/core": {
                            "/etc/motd": {"__sls__": "roles/core.motd", "file": ["managed"]}
                        }
                    }))
                }),
            );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn get_page(state: SharedState, uri: &str) -> (StatusCode, String) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = build_router(state).oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_page(test_state(DEAD_UPSTREAM), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_index_links_widgets() {
        let (status, body) = get_page(test_state(DEAD_UPSTREAM), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="/registry""#));
        assert!(body.contains(r#"href="/config""#));
    }

    #[tokio::test]
    async fn test_registry_page() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_page(test_state(&upstream), "/registry").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h3>alpine</h3>"));
        assert!(body.contains("<p><strong>3.20</strong> — sha256:ab</p>"));
    }

    #[tokio::test]
    async fn test_registry_page_upstream_down() {
        let (status, body) = get_page(test_state(DEAD_UPSTREAM), "/registry").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("Data unavailable"));
    }

    #[tokio::test]
    async fn test_servers_page_links_to_states() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_page(test_state(&upstream), "/config").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="/config/local""#));
    }

    #[tokio::test]
    async fn test_states_page_links_back() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_page(test_state(&upstream), "/config/local").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<h2 class="config-server">local</h2>"#));
        assert!(body.contains(r#"id="config-back-to-server-list""#));
        assert!(body.contains(r#"href="/config""#));
        assert!(body.contains(r#"<h4 class="config-unit">motd</h4>"#));
    }

    #[tokio::test]
    async fn test_states_page_unknown_server() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_page(test_state(&upstream), "/config/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("nope"));
    }

    #[tokio::test]
    async fn test_unknown_server_id_is_escaped() {
        let upstream = spawn_upstream().await;
        let (status, body) = get_page(
            test_state(&upstream),
            "/config/%3Cscript%3Ealert(1)%3C%2Fscript%3E",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[tokio::test]
    async fn test_missing_asset_path_is_escaped() {
        let (status, body) = get_page(
            test_state(DEAD_UPSTREAM),
            "/assets/%3Cimg%20src%3Dx%20onerror%3Dalert(1)%3E",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!body.contains("<img"));
        assert!(body.contains("No asset &lt;img src=x onerror=alert(1)&gt;"));
    }

    #[tokio::test]
    async fn test_decorate_endpoint() {
        let req = Request::builder()
            .method("POST")
            .uri("/decorate")
            .header("content-type", "text/plain")
            .body(Body::from("Fixed T42 in `main.rs`"))
            .unwrap();
        let resp = build_router(test_state(DEAD_UPSTREAM))
            .oneshot(req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            String::from_utf8(bytes.to_vec()).unwrap(),
            r#"Fixed <a href="https://source.test/T42">T42</a> in <code>main.rs</code>"#
        );
    }

    #[tokio::test]
    async fn test_stylesheet_asset() {
        let req = Request::builder()
            .uri("/assets/widgets.css")
            .body(Body::empty())
            .unwrap();
        let resp = build_router(test_state(DEAD_UPSTREAM))
            .oneshot(req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/css");
    }

    #[tokio::test]
    async fn test_missing_asset() {
        let (status, _) = get_page(test_state(DEAD_UPSTREAM), "/assets/nope.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert!(!config.dev_mode);
    }
}
