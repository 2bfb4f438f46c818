//! Configuration view and validation commands — `infra-widgets config`.

use anyhow::Result;

use super::super::ConfigCommands;

pub fn cmd_config(project_dir: &std::path::Path, command: Option<ConfigCommands>) -> Result<()> {
    use infra_widgets::widgets_config::{CONFIG_FILE_NAME, WidgetsConfig, WidgetsToml};

    let config_path = project_dir.join(CONFIG_FILE_NAME);

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Widgets Configuration");
            println!("=====================");
            println!();

            let toml = if config_path.exists() {
                println!("Config file: {}", config_path.display());
                WidgetsToml::load(&config_path)?
            } else {
                println!("No {} found at {}", CONFIG_FILE_NAME, project_dir.display());
                println!("Using default configuration.");
                WidgetsToml::default()
            };
            println!();

            println!("[links]");
            println!("  search_url = \"{}\"", toml.links.search_url);
            println!("  source_url = \"{}\"", toml.links.source_url);
            println!();
            println!("[registry]");
            println!("  api_url = \"{}\"", toml.registry.api_url);
            println!();
            println!("[salt]");
            println!("  servers_api_url = \"{}\"", toml.salt.servers_api_url);
            println!("  base_url = \"{}\"", toml.salt.base_url);
            println!("  staging_url = \"{}\"", toml.salt.staging_url);
            println!("  doc_states_url = \"{}\"", toml.salt.doc_states_url);
            println!();
            println!("[server]");
            println!("  port = {}", toml.server.port);
            println!();

            // Show effective values (including env overrides)
            println!("Effective values (with env overrides):");
            let config = WidgetsConfig::new(project_dir.to_path_buf())?;
            let links = config.link_targets();
            println!("  search_url = \"{}\"", links.search_url);
            println!("  source_url = \"{}\"", links.source_url);
            println!("  registry api_url = \"{}\"", config.registry_url());
            println!("  servers_api_url = \"{}\"", config.servers_url());
            println!();

            if !config_path.exists() {
                println!("Run 'infra-widgets config init' to create a {} file.", CONFIG_FILE_NAME);
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No {} found. Using defaults (valid).", CONFIG_FILE_NAME);
                return Ok(());
            }

            let toml = WidgetsToml::load(&config_path)?;
            let warnings = toml.validate();

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!(
                    "{} already exists at {}",
                    CONFIG_FILE_NAME,
                    config_path.display()
                );
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            std::fs::create_dir_all(project_dir)?;

            let toml = WidgetsToml::default();
            toml.save(&config_path)?;

            println!("Created {} at {}", CONFIG_FILE_NAME, config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [links] search_url, source_url for log message links");
            println!("  - [registry] api_url");
            println!("  - [salt] servers_api_url and repository browser URLs");
            println!("  - [server] port");
            println!();
        }
    }

    Ok(())
}
