//! Configuration for the widgets, read from `widgets.toml`.
//!
//! Settings are layered: file → environment → CLI. A missing file means
//! defaults everywhere.
//!
//! # Configuration File Format
//!
//! ```toml
//! [links]
//! search_url = "https://devcentral.nasqueron.org/search/?query="
//! source_url = "https://devcentral.nasqueron.org/"
//!
//! [registry]
//! api_url = "https://api.nasqueron.org/docker/registry"
//!
//! [salt]
//! servers_api_url = "https://api.nasqueron.org/infra/servers.json"
//! base_url = "https://devcentral.nasqueron.org/source/operations/browse/main/"
//! staging_url = "https://devcentral.nasqueron.org/source/staging/browse/master/"
//! doc_states_url = "https://docs.saltproject.io/en/latest/ref/states/all/"
//!
//! [server]
//! port = 8080
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::decorator::LinkTargets;
use crate::registry::DEFAULT_REGISTRY_API_URL;
use crate::salt::{
    DEFAULT_DOC_STATES_URL, DEFAULT_SALT_BASE_URL, DEFAULT_SALT_STAGING_URL,
    DEFAULT_SERVERS_API_URL, SaltLinks,
};

pub const CONFIG_FILE_NAME: &str = "widgets.toml";

pub const ENV_SEARCH_URL: &str = "WIDGETS_SEARCH_URL";
pub const ENV_SOURCE_URL: &str = "WIDGETS_SOURCE_URL";
pub const ENV_REGISTRY_URL: &str = "WIDGETS_REGISTRY_URL";
pub const ENV_SERVERS_URL: &str = "WIDGETS_SERVERS_URL";

/// Container registry API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySection {
    #[serde(default = "default_registry_api_url")]
    pub api_url: String,
}

fn default_registry_api_url() -> String {
    DEFAULT_REGISTRY_API_URL.to_string()
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            api_url: default_registry_api_url(),
        }
    }
}

/// Salt viewer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaltSection {
    #[serde(default = "default_servers_api_url")]
    pub servers_api_url: String,
    /// Repository browser for `salt://` sources
    #[serde(default = "default_salt_base_url")]
    pub base_url: String,
    /// Repository browser for `salt://software/` and `salt://wwwroot/`
    #[serde(default = "default_salt_staging_url")]
    pub staging_url: String,
    #[serde(default = "default_doc_states_url")]
    pub doc_states_url: String,
}

fn default_servers_api_url() -> String {
    DEFAULT_SERVERS_API_URL.to_string()
}

fn default_salt_base_url() -> String {
    DEFAULT_SALT_BASE_URL.to_string()
}

fn default_salt_staging_url() -> String {
    DEFAULT_SALT_STAGING_URL.to_string()
}

fn default_doc_states_url() -> String {
    DEFAULT_DOC_STATES_URL.to_string()
}

impl Default for SaltSection {
    fn default() -> Self {
        Self {
            servers_api_url: default_servers_api_url(),
            base_url: default_salt_base_url(),
            staging_url: default_salt_staging_url(),
            doc_states_url: default_doc_states_url(),
        }
    }
}

impl SaltSection {
    pub fn links(&self) -> SaltLinks {
        SaltLinks {
            base_url: self.base_url.clone(),
            staging_url: self.staging_url.clone(),
            doc_states_url: self.doc_states_url.clone(),
        }
    }
}

/// Widget server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Contents of `widgets.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetsToml {
    #[serde(default)]
    pub links: LinkTargets,
    #[serde(default)]
    pub registry: RegistrySection,
    #[serde(default)]
    pub salt: SaltSection,
    #[serde(default)]
    pub server: ServerSection,
}

impl WidgetsToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse widgets.toml")
    }

    /// Load `widgets.toml` from a directory, or defaults if there is none.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize widgets.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Decorator link targets, environment overriding the file.
    pub fn link_targets(&self) -> LinkTargets {
        LinkTargets {
            search_url: env_or(ENV_SEARCH_URL, &self.links.search_url),
            source_url: env_or(ENV_SOURCE_URL, &self.links.source_url),
        }
    }

    pub fn registry_url(&self) -> String {
        env_or(ENV_REGISTRY_URL, &self.registry.api_url)
    }

    pub fn servers_url(&self) -> String {
        env_or(ENV_SERVERS_URL, &self.salt.servers_api_url)
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let urls = [
            ("links.search_url", &self.links.search_url, false),
            ("links.source_url", &self.links.source_url, true),
            ("registry.api_url", &self.registry.api_url, false),
            ("salt.servers_api_url", &self.salt.servers_api_url, false),
            ("salt.base_url", &self.salt.base_url, true),
            ("salt.staging_url", &self.salt.staging_url, true),
            ("salt.doc_states_url", &self.salt.doc_states_url, true),
        ];

        for (key, url, is_prefix) in urls {
            if !is_http_url(url) {
                warnings.push(format!(
                    "Invalid {} '{}': should start with http:// or https://",
                    key, url
                ));
            } else if is_prefix && !url.ends_with('/') {
                warnings.push(format!(
                    "{} '{}' should end with '/': paths are appended to it",
                    key, url
                ));
            }
        }

        if self.server.port == 0 {
            warnings.push("server.port is 0: a random port will be picked".to_string());
        }

        warnings
    }
}

fn env_or(var: &str, fallback: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Configuration resolved for a project directory.
///
/// Merges settings from:
/// 1. widgets.toml file
/// 2. Environment variables
/// 3. CLI arguments
#[derive(Debug, Clone)]
pub struct WidgetsConfig {
    pub project_dir: PathBuf,
    pub toml: WidgetsToml,
    /// CLI override for the server port
    pub cli_port: Option<u16>,
}

impl WidgetsConfig {
    pub fn new(project_dir: PathBuf) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;
        let toml = WidgetsToml::load_or_default(&project_dir)?;

        Ok(Self {
            project_dir,
            toml,
            cli_port: None,
        })
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.cli_port = port;
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.project_dir.join(CONFIG_FILE_NAME)
    }

    pub fn link_targets(&self) -> LinkTargets {
        self.toml.link_targets()
    }

    pub fn salt_links(&self) -> SaltLinks {
        self.toml.salt.links()
    }

    pub fn registry_url(&self) -> String {
        self.toml.registry_url()
    }

    pub fn servers_url(&self) -> String {
        self.toml.servers_url()
    }

    /// Server port (CLI → file → default).
    pub fn port(&self) -> u16 {
        self.cli_port.unwrap_or(self.toml.server.port)
    }

    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}
