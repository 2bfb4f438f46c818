//! Per-server states view.
//!
//! States come as `role → state name → state`, a state mapping a Salt state
//! module to its arguments: one string (the method) and keyword objects.
//! Keys starting with `__` are metadata, `__sls__` naming the source unit.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_SALT_BASE_URL: &str =
    "https://devcentral.nasqueron.org/source/operations/browse/main/";
pub const DEFAULT_SALT_STAGING_URL: &str =
    "https://devcentral.nasqueron.org/source/staging/browse/master/";
pub const DEFAULT_DOC_STATES_URL: &str = "https://docs.saltproject.io/en/latest/ref/states/all/";

const SALT_SCHEME: &str = "salt://";

/// Salt sources living in the staging repository rather than operations.
const STAGING_PREFIXES: &[&str] = &["salt://software/", "salt://wwwroot/"];

/// Where Salt sources and state modules documentation are browsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltLinks {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_staging_url")]
    pub staging_url: String,
    #[serde(default = "default_doc_states_url")]
    pub doc_states_url: String,
}

fn default_base_url() -> String {
    DEFAULT_SALT_BASE_URL.to_string()
}

fn default_staging_url() -> String {
    DEFAULT_SALT_STAGING_URL.to_string()
}

fn default_doc_states_url() -> String {
    DEFAULT_DOC_STATES_URL.to_string()
}

impl Default for SaltLinks {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            staging_url: default_staging_url(),
            doc_states_url: default_doc_states_url(),
        }
    }
}

/// Heading anchors can't hold the `/` of nested role names.
pub fn make_id(expression: &str) -> String {
    expression.replacen('/', ".", 1)
}

pub fn is_in_staging_repo(url: &str) -> bool {
    STAGING_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

/// The state method is the only string among a module's arguments.
pub fn extract_method(properties: &[Value]) -> Option<&str> {
    properties.iter().find_map(Value::as_str)
}

/// Renders the states applied to one server.
#[derive(Debug, Clone)]
pub struct StatesView {
    links: SaltLinks,
    server: String,
}

impl StatesView {
    pub fn new(links: SaltLinks, server: impl Into<String>) -> Self {
        Self {
            links,
            server: server.into(),
        }
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Full view: back link to the servers list, server name, states.
    pub fn format_config(&self, states: &Value, back_href: &str) -> String {
        format!(
            concat!(
                r#"<a id="config-back-to-server-list" class="button extra-action" href="{}">"#,
                "« Back to servers list</a>\n",
                r#"<h2 class="config-server">{}</h2>"#,
                "\n{}",
            ),
            back_href,
            self.server,
            self.format_states(states)
        )
    }

    /// Roles summary, then each role's states under their unit headings.
    pub fn format_states(&self, server_states: &Value) -> String {
        let mut roles = Vec::new();
        let mut roles_output = String::new();
        let mut current_unit = String::new();

        for (role, role_states) in server_states.as_object().into_iter().flatten() {
            roles.push(role.as_str());

            roles_output.push_str(&format!(
                concat!(
                    r#"<div class="config-role">"#,
                    "\n",
                    r#"<h3 id="{}" class="config-role-title">{}</h3>"#,
                    "\n",
                    r#"<div class="config-role-content">"#,
                ),
                make_id(role),
                role
            ));

            match role_states.as_object().filter(|states| !states.is_empty()) {
                None => roles_output.push_str(concat!(
                    r#"<p class="config-error">No information gathered for this role. "#,
                    "There is probably an error in Salt configuration.</p>",
                )),
                Some(states) => {
                    let role_prefix = format!("{}.", role);
                    for (name, state) in states {
                        let sls = state.get("__sls__").and_then(Value::as_str).unwrap_or("");
                        let unit = sls.replacen(&role_prefix, "", 1);
                        if unit != current_unit {
                            roles_output.push_str(&format!(r#"<h4 class="config-unit">{}</h4>"#, unit));
                            current_unit = unit;
                        }

                        roles_output.push_str(&self.format_state(name, state));
                    }
                }
            }

            roles_output.push_str("</div></div>");
        }
        roles_output.push_str("</div>");

        let mut output = String::from(r#"<div class="states">"#);
        output.push_str(concat!(
            "\n",
            r#"<div class="config-summary-roles">"#,
            "\n",
            r#"<h3 class="config-summary-roles-heading">Roles assigned</h3>"#,
            "\n",
            r#"<ul class="config-summary-roles-list">"#,
        ));
        for role in roles {
            output.push_str(&format!(
                r##"<li class="config-summary-role"><a href="#{}">{}</a></li>"##,
                make_id(role),
                role
            ));
        }
        output.push_str("</ul></div>");
        output.push_str(&roles_output);

        output
    }

    /// One state: its name, then each module call with its arguments.
    pub fn format_state(&self, name: &str, state: &Value) -> String {
        let mut output = String::from(r#"<div class="state">"#);
        output.push_str(&format!(r#"<div class="state-name">{}</div>"#, name));

        for (key, properties) in state.as_object().into_iter().flatten() {
            if key.starts_with("__") {
                continue;
            }
            let properties = properties.as_array().map(Vec::as_slice).unwrap_or_default();

            output.push_str(&format!(
                r#"<div class="state-module">{}</div>"#,
                self.resolve_module_method(key, properties)
            ));

            output.push_str(r#"<div class="state-properties">"#);
            for property in properties {
                // The method string is already in the module link, and
                // states arrive sorted so `order` adds nothing
                if property.is_string() || property.get("order").is_some() {
                    continue;
                }
                output.push_str(&self.dump(property));
            }
            output.push_str("</div>");
        }

        output.push_str("</div>");
        output
    }

    /// Link `module.method` to the state module documentation.
    pub fn resolve_module_method(&self, module: &str, properties: &[Value]) -> String {
        let method = extract_method(properties).unwrap_or_default();
        let link = format!(
            "{}salt.states.{module}.html#salt.states.{module}.{method}",
            self.links.doc_states_url
        );

        format!(r#"<a class="salt-link" href="{link}">{module}.{method}</a>"#)
    }

    /// Link a `salt://` URL to the repository browser holding it.
    pub fn resolve_salt_link(&self, url: &str) -> String {
        let base = if is_in_staging_repo(url) {
            &self.links.staging_url
        } else {
            &self.links.base_url
        };

        let link = format!("{}{}", base, url.replacen(SALT_SCHEME, "", 1));
        format!(r#"<a class="salt-link" href="{link}">{url}</a>"#)
    }

    /// Recursively render arbitrary state data.
    pub fn dump(&self, data: &Value) -> String {
        match data {
            Value::Null => r#"<span class="null">NULL</span>"#.to_string(),
            Value::String(s) if s.starts_with(SALT_SCHEME) => self.resolve_salt_link(s),
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(values) => self.dump_array(values),
            Value::Object(map) => self.dump_object(map),
        }
    }

    fn dump_array(&self, values: &[Value]) -> String {
        let mut dumped = String::from(r#"<ul class="state-list">"#);
        for value in values {
            dumped.push_str(&format!(
                r#"<li class="state-list-item">{}</li>"#,
                self.dump(value)
            ));
        }
        dumped.push_str("</ul>");
        dumped
    }

    fn dump_object(&self, data: &serde_json::Map<String, Value>) -> String {
        data.iter()
            .map(|(key, value)| {
                format!(
                    concat!(
                        r#"<div class="state-property">"#,
                        r#"<span class="key">{}</span>"#,
                        r#"<span class="value">{}</span>"#,
                        "</div>",
                    ),
                    key,
                    self.dump(value)
                )
            })
            .collect()
    }
}
