//! Widget server command — `infra-widgets serve`.

use anyhow::Result;

use infra_widgets::server::{AppState, ServerConfig, start_server};
use infra_widgets::widgets_config::WidgetsConfig;

pub async fn cmd_serve(
    project_dir: &std::path::Path,
    port: Option<u16>,
    open: bool,
    dev: bool,
) -> Result<()> {
    let config = WidgetsConfig::new(project_dir.to_path_buf())?.with_port(port);
    tracing::debug!(path = %config.config_path().display(), "widgets configuration");
    for warning in config.validate() {
        tracing::warn!("{}", warning);
    }

    let port = config.port();

    // Spawn browser open before starting the server (which blocks)
    if open {
        let url = format!("http://localhost:{}", port);
        tokio::spawn(async move {
            // Small delay to let the server start binding
            tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
            if let Err(e) = open::that(&url) {
                tracing::warn!(error = %e, "failed to open browser");
            }
        });
    }

    start_server(
        ServerConfig {
            port,
            dev_mode: dev,
        },
        AppState::from_config(&config),
    )
    .await
}
