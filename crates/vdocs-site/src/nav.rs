//! Navigation built from a table of contents.

use std::fmt::Write;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use vdocs_renderer::sanitize_text;
use vdocs_source::normalize_url_path;

use crate::toc::TableOfContents;

/// Characters left unescaped in URL path segments.
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Navigation entry with its link target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display name.
    pub name: String,
    /// Manifest slug.
    pub slug: String,
    /// Link target, `/<version>/<slug>[/<child>]`.
    pub href: String,
    /// Whether this entry is the current page.
    pub active: bool,
    /// Child entries.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// Build navigation entries for `toc` under `version`.
///
/// An entry is active when its logical path matches `current_path` after
/// normalization. Pass `None` when no page is current.
#[must_use]
pub fn navigation(toc: &TableOfContents, version: &str, current_path: Option<&str>) -> Vec<NavItem> {
    let current = current_path.and_then(normalize_url_path);
    let is_current = |path: &str| current.as_deref() == Some(path);

    toc.list_items()
        .into_iter()
        .map(|item| {
            let path = format!("/{}", encode_segment(&item.slug));
            let children = item
                .children
                .into_iter()
                .map(|child| {
                    let child_path = format!("{path}/{}", encode_segment(&child.slug));
                    NavItem {
                        name: child.name,
                        slug: child.slug,
                        href: format!("/{version}{child_path}"),
                        active: is_current(&child_path),
                        children: Vec::new(),
                    }
                })
                .collect();
            NavItem {
                name: item.name,
                slug: item.slug,
                href: format!("/{version}{path}"),
                active: is_current(&path),
                children,
            }
        })
        .collect()
}

/// Render the table of contents as an ordered list.
///
/// Names are escaped, the current page carries `class="active"` and
/// `aria-current="page"`.
#[must_use]
pub fn render_toc(toc: &TableOfContents, version: &str, current_path: &str) -> String {
    let mut html = String::from(r#"<ol class="list">"#);
    for item in navigation(toc, version, Some(current_path)) {
        write_item(&mut html, &item);
    }
    html.push_str("</ol>");
    html
}

fn write_item(html: &mut String, item: &NavItem) {
    if item.active {
        html.push_str(r#"<li class="active" aria-current="page">"#);
    } else {
        html.push_str("<li>");
    }
    let _ = write!(
        html,
        r#"<a href="{}">{}</a>"#,
        item.href,
        sanitize_text(&item.name)
    );
    if !item.children.is_empty() {
        html.push_str(r#"<ol class="list">"#);
        for child in &item.children {
            write_item(html, child);
        }
        html.push_str("</ol>");
    }
    html.push_str("</li>");
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn toc() -> TableOfContents {
        TableOfContents::from_json(
            r#"{
                "introduction": { "name": "Introduction" },
                "runtime": {
                    "name": "The Runtime",
                    "children": { "permissions": "Permissions" }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_navigation_links() {
        let nav = navigation(&toc(), "1.12.1", None);

        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].href, "/1.12.1/introduction");
        assert_eq!(nav[1].children[0].href, "/1.12.1/runtime/permissions");
        assert!(nav.iter().all(|item| !item.active));
    }

    #[test]
    fn test_navigation_active_child() {
        let nav = navigation(&toc(), "1.12.1", Some("runtime/permissions"));

        assert!(!nav[1].active);
        assert!(nav[1].children[0].active);
    }

    #[test]
    fn test_slug_is_encoded() {
        let toc = TableOfContents::from_json(r#"{"a b": {"name": "A B"}}"#).unwrap();

        let nav = navigation(&toc, "local", Some("/a b"));

        assert_eq!(nav[0].href, "/local/a%20b");
        assert!(nav[0].active);
    }

    #[test]
    fn test_render_toc() {
        let html = render_toc(&toc(), "1.12.1", "/introduction");

        assert_eq!(
            html,
            concat!(
                r#"<ol class="list">"#,
                r#"<li class="active" aria-current="page"><a href="/1.12.1/introduction">Introduction</a></li>"#,
                r#"<li><a href="/1.12.1/runtime">The&#32;Runtime</a>"#,
                r#"<ol class="list"><li><a href="/1.12.1/runtime/permissions">Permissions</a></li></ol>"#,
                "</li></ol>",
            )
        );
    }

    #[test]
    fn test_render_toc_escapes_names() {
        let toc = TableOfContents::from_json(r#"{"x": {"name": "<script>"}}"#).unwrap();

        let html = render_toc(&toc, "local", "/");

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
