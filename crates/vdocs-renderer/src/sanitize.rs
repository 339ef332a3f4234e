//! HTML sanitization.
//!
//! Rendered markdown may contain arbitrary raw HTML, so every page passes
//! through an `ammonia` allowlist before it is served. [`Sanitizer`] is built
//! once and shared read-only across requests.

use std::borrow::Cow;

use ammonia::Builder;

/// Languages known to the client-side syntax highlighter.
///
/// Code blocks keep their `language-*` class only for these languages.
const HIGHLIGHTER_CLASSES: &[&str] = &[
    // js
    "language-javascript",
    "language-js",
    // ts
    "language-typescript",
    "language-ts",
    // json
    "language-json",
    "language-jsonc",
    // markup
    "language-markup",
    "language-mathml",
    "language-html",
    "language-xml",
    "language-rss",
    "language-ssml",
    "language-svg",
    // shell
    "language-shell",
    "language-sh",
    "language-bash",
    // wasm
    "language-wasm",
];

/// Classes of the decorative link icon injected into heading anchors.
const ICON_CLASSES: &[&str] = &["octicon", "octicon-link"];

/// Attributes needed by accessible heading anchors.
const ANCHOR_ATTRIBUTES: &[&str] = &["aria-hidden", "tabindex", "id"];

/// Allowlist-based HTML cleaner.
pub struct Sanitizer {
    builder: Builder<'static>,
}

impl Sanitizer {
    /// Create the documentation allowlist.
    ///
    /// Starts from ammonia's defaults and widens them with:
    /// - `class` on `code` (highlighter languages), `a` (`anchor`) and `svg`
    /// - `aria-hidden`, `tabindex` and `id` on `a`
    /// - `input` restricted to task list checkboxes
    #[must_use]
    pub fn new() -> Self {
        let mut builder = Builder::default();
        builder
            .add_allowed_classes("svg", ICON_CLASSES)
            .add_allowed_classes("code", HIGHLIGHTER_CLASSES)
            .add_allowed_classes("a", &["anchor"])
            .add_tag_attributes("a", ANCHOR_ATTRIBUTES)
            .add_tags(&["input"])
            .add_tag_attributes("input", &["type", "checked", "disabled"])
            .attribute_filter(filter_attribute);
        Self { builder }
    }

    /// Clean an HTML fragment.
    ///
    /// Disallowed elements are removed (`script` and `style` together with
    /// their content), not escaped.
    #[must_use]
    pub fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop `input` types other than checkboxes.
fn filter_attribute<'u>(element: &str, attribute: &str, value: &'u str) -> Option<Cow<'u, str>> {
    if element == "input" && attribute == "type" && value != "checkbox" {
        return None;
    }
    Some(Cow::Borrowed(value))
}

/// Escape arbitrary text for inclusion in HTML.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    ammonia::clean_text(text)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_script_is_removed_with_content() {
        let sanitizer = Sanitizer::new();

        assert_eq!(
            sanitizer.clean("<p>XSS <script>alert(1)</script></p>"),
            "<p>XSS </p>"
        );
    }

    #[test]
    fn test_event_handlers_are_removed() {
        let sanitizer = Sanitizer::new();

        assert_eq!(
            sanitizer.clean(r#"<p onclick="alert(1)">Hi</p>"#),
            "<p>Hi</p>"
        );
    }

    #[test]
    fn test_highlighter_class_kept() {
        let sanitizer = Sanitizer::new();

        assert_eq!(
            sanitizer.clean(r#"<pre><code class="language-ts">let a;</code></pre>"#),
            r#"<pre><code class="language-ts">let a;</code></pre>"#
        );
    }

    #[test]
    fn test_unknown_class_dropped() {
        let sanitizer = Sanitizer::new();

        let html = sanitizer.clean(r#"<code class="evil language-ts">x</code>"#);

        assert!(!html.contains("evil"));
        assert!(html.contains("language-ts"));
    }

    #[test]
    fn test_anchor_attributes_kept() {
        let sanitizer = Sanitizer::new();

        let html = sanitizer.clean(
            r##"<a href="#intro" aria-hidden="true" class="anchor" id="intro"></a>"##,
        );

        assert_eq!(
            html,
            r##"<a href="#intro" aria-hidden="true" class="anchor" id="intro" rel="noopener noreferrer"></a>"##
        );
    }

    #[test]
    fn test_task_list_checkbox_kept() {
        let sanitizer = Sanitizer::new();

        let html = sanitizer.clean(r#"<input type="checkbox" checked="" disabled="" />"#);

        assert!(html.contains(r#"type="checkbox""#));
        assert!(html.contains("disabled"));
    }

    #[test]
    fn test_text_input_type_dropped() {
        let sanitizer = Sanitizer::new();

        let html = sanitizer.clean(r#"<input type="text" />"#);

        assert!(!html.contains("text"));
    }

    #[test]
    fn test_sanitize_text() {
        assert!(!sanitize_text("<b>Bold</b>").contains('<'));
        assert_eq!(sanitize_text("Getting Started"), "Getting&#32;Started");
    }
}
