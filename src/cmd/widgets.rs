//! Widget rendering commands — `infra-widgets registry|servers|states`.
//!
//! Each command fetches its data and prints the HTML fragment to stdout.

use anyhow::Result;

use infra_widgets::registry::{RegistryClient, loading_message, render_repositories};
use infra_widgets::salt::{SaltClient, StatesView, format_servers};
use infra_widgets::server::pages::CONFIG_ROUTE;
use infra_widgets::widgets_config::WidgetsConfig;

pub async fn cmd_registry(project_dir: &std::path::Path, url: Option<&str>) -> Result<()> {
    let config = WidgetsConfig::new(project_dir.to_path_buf())?;
    let api_url = url.map(str::to_string).unwrap_or_else(|| config.registry_url());

    eprintln!("{}", loading_message(&api_url));
    let repositories = RegistryClient::new(api_url).get_all_repositories().await?;
    println!("{}", render_repositories(&repositories));

    Ok(())
}

pub async fn cmd_servers(project_dir: &std::path::Path) -> Result<()> {
    let config = WidgetsConfig::new(project_dir.to_path_buf())?;

    let servers = SaltClient::new(config.servers_url()).fetch_servers().await?;
    println!("{}", format_servers(&servers, CONFIG_ROUTE));

    Ok(())
}

pub async fn cmd_states(project_dir: &std::path::Path, server: &str) -> Result<()> {
    let config = WidgetsConfig::new(project_dir.to_path_buf())?;

    let (_, states) = SaltClient::new(config.servers_url())
        .fetch_server_states(server)
        .await?;
    let view = StatesView::new(config.salt_links(), server);
    println!("{}", view.format_config(&states, CONFIG_ROUTE));

    Ok(())
}
