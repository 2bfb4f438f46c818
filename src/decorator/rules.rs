//! The ordered rule set and the decorator applying it.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::hash::{KNOWN_HEX_WORDS, is_hash};

pub const DEFAULT_SEARCH_URL: &str = "https://devcentral.nasqueron.org/search/?query=";
pub const DEFAULT_SOURCE_URL: &str = "https://devcentral.nasqueron.org/";

// Compile regexes once using LazyLock. Word boundaries are ASCII
// (`(?-u:\b)`): a token right after `é` still starts a word.
static COMMIT_HASH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)([0-9a-f]{7,40})(?-u:\b)").unwrap());

static REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)([TDP][0-9]{1,6}(?:#[0-9]{1,10})?)(?-u:\b)").unwrap()
});

static CALLSIGN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)r([A-Z]{3,32})(?-u:\b)").unwrap());

static CALLSIGN_COMMIT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)(r[A-Z]{3,32}[0-9a-f]{7,40})(?-u:\b)").unwrap()
});

// Same line only: `.` doesn't cross newlines without the s flag
static CODE_SPAN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.*?)`").unwrap());

static DEFAULT_DECORATOR: LazyLock<MessageDecorator> =
    LazyLock::new(|| MessageDecorator::new(LinkTargets::default()));

/// Base URLs the decorator links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTargets {
    /// Search endpoint; the hash is appended to it
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Source browsing / issue tracker root, ending with a slash
    #[serde(default = "default_source_url")]
    pub source_url: String,
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

impl Default for LinkTargets {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            source_url: default_source_url(),
        }
    }
}

/// What a rule's pattern is replaced with.
pub enum Replacement {
    /// Expansion template, capture groups referenced as `${0}`, `${1}`...
    Template(String),
    /// Computed from the match captures.
    Computed(fn(&Captures<'_>, &RuleContext<'_>) -> String),
}

/// Read-only data handed to computed replacements.
pub struct RuleContext<'a> {
    pub links: &'a LinkTargets,
    pub known_words: &'a HashSet<&'static str>,
}

/// One pattern + replacement pair of the pipeline.
pub struct DecoratorRule {
    pub name: &'static str,
    pub pattern: &'static Regex,
    pub replacement: Replacement,
}

impl DecoratorRule {
    /// Replace every non-overlapping match, left to right.
    pub fn apply<'t>(&self, text: &'t str, context: &RuleContext<'_>) -> Cow<'t, str> {
        match &self.replacement {
            Replacement::Template(template) => self.pattern.replace_all(text, template.as_str()),
            Replacement::Computed(compute) => self
                .pattern
                .replace_all(text, |caps: &Captures<'_>| compute(caps, context)),
        }
    }
}

impl std::fmt::Debug for DecoratorRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoratorRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Applies the fixed rule pipeline to log messages.
///
/// Immutable once built: share it behind a reference or an `Arc` and call
/// [`MessageDecorator::decorate`] from as many threads as needed.
#[derive(Debug)]
pub struct MessageDecorator {
    links: LinkTargets,
    known_words: HashSet<&'static str>,
    rules: Vec<DecoratorRule>,
}

impl MessageDecorator {
    /// Create a decorator with the built-in known hexadecimal words.
    pub fn new(links: LinkTargets) -> Self {
        Self::with_known_words(links, KNOWN_HEX_WORDS.clone())
    }

    pub fn with_known_words(links: LinkTargets, known_words: HashSet<&'static str>) -> Self {
        let rules = build_rules(&links);
        Self {
            links,
            known_words,
            rules,
        }
    }

    pub fn links(&self) -> &LinkTargets {
        &self.links
    }

    /// Names of the rules, in application order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    /// Decorate one raw log message.
    ///
    /// Each rule sees the output of the previous ones. Applying this to an
    /// already decorated message is not idempotent: anchor attributes can
    /// hold hexadecimal-looking text.
    pub fn decorate(&self, message: &str) -> String {
        let context = RuleContext {
            links: &self.links,
            known_words: &self.known_words,
        };

        let mut text = message.to_string();
        for rule in &self.rules {
            let rewritten = match rule.apply(&text, &context) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(rewritten) => rewritten,
            };
            tracing::trace!(rule = rule.name, "message rewritten");
            text = rewritten;
        }
        text
    }
}

/// Decorate a message with the default link targets.
pub fn decorate(message: &str) -> String {
    DEFAULT_DECORATOR.decorate(message)
}

/// `$` is the expansion marker in replacement templates.
fn escape_template(url: &str) -> String {
    url.replace('$', "$$")
}

fn link_hash(caps: &Captures<'_>, context: &RuleContext<'_>) -> String {
    let token = &caps[1];
    if !is_hash(token, context.known_words) {
        return token.to_string();
    }
    format!(
        r#"<a href="{}{}">{}</a>"#,
        context.links.search_url, token, token
    )
}

/// Build the pipeline. Order matters:
///
/// - the callsign rule runs before the commit-with-callsign rule; the
///   former can't match inside `rOPS1234abc` (no word boundary after the
///   callsign), and its anchors are no longer of the latter's shape
/// - code spans come last, so their content was already scanned for hashes
///   and the inserted `<code>` never gets rescanned
fn build_rules(links: &LinkTargets) -> Vec<DecoratorRule> {
    let source = escape_template(&links.source_url);

    vec![
        DecoratorRule {
            name: "commit-hash",
            pattern: &COMMIT_HASH_REGEX,
            replacement: Replacement::Computed(link_hash),
        },
        DecoratorRule {
            name: "task-reference",
            pattern: &REFERENCE_REGEX,
            replacement: Replacement::Template(format!(r#"<a href="{source}${{0}}">${{0}}</a>"#)),
        },
        DecoratorRule {
            name: "callsign",
            pattern: &CALLSIGN_REGEX,
            replacement: Replacement::Template(format!(
                r#"<a href="{source}diffusion/${{1}}/">${{0}}</a>"#
            )),
        },
        DecoratorRule {
            name: "commit-with-callsign",
            pattern: &CALLSIGN_COMMIT_REGEX,
            replacement: Replacement::Template(format!(r#"<a href="{source}${{0}}">${{0}}</a>"#)),
        },
        DecoratorRule {
            name: "code-span",
            pattern: &CODE_SPAN_REGEX,
            replacement: Replacement::Template("<code>${1}</code>".to_string()),
        },
    ]
}
