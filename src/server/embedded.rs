//! Page layout and stylesheet, embedded in the binary.

use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/assets/"]
pub struct Assets;

const LAYOUT: &str = "layout.html";

/// Escape text for an HTML element or attribute value.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap a widget fragment into the site layout.
///
/// `title` is plain text and gets escaped; `body` is trusted HTML.
pub fn render_page(title: &str, body: &str) -> String {
    let title = escape_html(title);
    match Assets::get(LAYOUT) {
        Some(layout) => fill_layout(&String::from_utf8_lossy(&layout.data), &title, body),
        None => format!("<!doctype html><title>{}</title>{}", title, body),
    }
}

/// Substitute `{{title}}` and `{{body}}` in a single scan of the layout,
/// so placeholders inside the substituted values are left alone.
fn fill_layout(layout: &str, title: &str, body: &str) -> String {
    let mut page = String::with_capacity(layout.len() + title.len() + body.len());
    let mut rest = layout;
    while let Some(start) = rest.find("{{") {
        page.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(tail) = tail.strip_prefix("{{title}}") {
            page.push_str(title);
            rest = tail;
        } else if let Some(tail) = tail.strip_prefix("{{body}}") {
            page.push_str(body);
            rest = tail;
        } else {
            page.push_str("{{");
            rest = &tail[2..];
        }
    }
    page.push_str(rest);
    page
}
