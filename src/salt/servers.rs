//! Servers list and its rendering.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A server as described by the infrastructure servers API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// FQDN, also where the server publishes its states
    #[serde(default)]
    pub hostname: String,
    /// Configuration management tool in charge of the server
    #[serde(default)]
    pub configurator: String,
}

impl Server {
    pub fn is_salt_managed(&self) -> bool {
        self.configurator == "salt"
    }
}

/// Servers keyed by id, in the order the API sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerList {
    servers: Vec<(String, Server)>,
}

impl ServerList {
    pub fn new(servers: Vec<(String, Server)>) -> Self {
        Self { servers }
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Server)> {
        self.servers.iter().map(|(id, server)| (id.as_str(), server))
    }

    /// Servers whose configuration is managed by Salt.
    pub fn salt_servers(&self) -> impl Iterator<Item = (&str, &Server)> {
        self.iter().filter(|(_, server)| server.is_salt_managed())
    }

    pub fn find(&self, id: &str) -> Option<&Server> {
        self.iter()
            .find(|(server_id, _)| *server_id == id)
            .map(|(_, server)| server)
    }
}

impl<'de> Deserialize<'de> for ServerList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ServerListVisitor;

        impl<'de> Visitor<'de> for ServerListVisitor {
            type Value = ServerList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of server id to server")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ServerList, A::Error> {
                let mut servers = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, server)) = map.next_entry::<String, Server>()? {
                    servers.push((id, server));
                }
                Ok(ServerList { servers })
            }
        }

        deserializer.deserialize_map(ServerListVisitor)
    }
}

/// Render the Salt-managed servers, each linking to `{nav_base}/{id}`.
pub fn format_servers(servers: &ServerList, nav_base: &str) -> String {
    let nav_base = nav_base.trim_end_matches('/');

    let mut output = String::from(r#"<h2>Servers</h2><ul class="servers">"#);
    for (id, server) in servers.salt_servers() {
        output.push_str(&format!(
            concat!(
                "\n",
                r#"<li class="server" id="{id}" data-hostname="{hostname}">"#,
                r#"<a class="server-link" href="{nav_base}/{id}">"#,
                r#"<span class="server-property server-name">{name}</span>"#,
                r#"<span class="server-property server-description">{description}</span>"#,
                "</a></li>",
            ),
            id = id,
            hostname = server.hostname,
            nav_base = nav_base,
            name = server.name,
            description = server.description,
        ));
    }
    output.push_str("</ul>");

    output
}
