//! Heading anchor decoration.
//!
//! comrak emits an empty self link at the start of every heading. After
//! sanitization each of those links receives a link icon and is taken out of
//! the tab order, since the heading itself is already focusable content.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Octicon "link" icon placed inside heading anchors.
pub const OCTICON_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" class="octicon octicon-link"><path fill-rule="evenodd" d="M7.775 3.275a.75.75 0 001.06 1.06l1.25-1.25a2 2 0 112.83 2.83l-2.5 2.5a2 2 0 01-2.83 0 .75.75 0 00-1.06 1.06 3.5 3.5 0 004.95 0l2.5-2.5a3.5 3.5 0 00-4.95-4.95l-1.25 1.25zm-4.69 9.64a2 2 0 010-2.83l2.5-2.5a2 2 0 012.83 0 .75.75 0 001.06-1.06 3.5 3.5 0 00-4.95 0l-2.5 2.5a3.5 3.5 0 004.95 4.95l1.25-1.25a.75.75 0 00-1.06-1.06l-1.25 1.25a2 2 0 01-2.83 0z"/></svg>"#;

/// Auto-generated heading anchor as serialized by the sanitizer.
static HEADING_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r##"(<a href="#[^"]*" aria-hidden="true")( class="anchor" id="[^"]*"[^>]*)></a>"##,
    )
    .expect("invalid heading anchor regex")
});

/// Inject the link icon into heading anchors and remove them from tab order.
#[must_use]
pub fn decorate_heading_anchors(html: &str) -> String {
    HEADING_ANCHOR
        .replace_all(html, |caps: &Captures<'_>| {
            format!(r#"{} tabindex="-1"{}>{OCTICON_SVG}</a>"#, &caps[1], &caps[2])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_anchor_is_decorated() {
        let html = r##"<h2><a href="#hello-world" aria-hidden="true" class="anchor" id="hello-world" rel="noopener noreferrer"></a>Hello World</h2>"##;

        let expected = format!(
            r##"<h2><a href="#hello-world" aria-hidden="true" tabindex="-1" class="anchor" id="hello-world" rel="noopener noreferrer">{OCTICON_SVG}</a>Hello World</h2>"##
        );
        assert_eq!(decorate_heading_anchors(html), expected);
    }

    #[test]
    fn test_every_anchor_is_decorated() {
        let html = concat!(
            r##"<h1><a href="#a" aria-hidden="true" class="anchor" id="a"></a>A</h1>"##,
            "\n",
            r##"<h3><a href="#b" aria-hidden="true" class="anchor" id="b"></a>B</h3>"##,
        );

        let decorated = decorate_heading_anchors(html);

        assert_eq!(decorated.matches("octicon-link").count(), 2);
        assert_eq!(decorated.matches(r#"tabindex="-1""#).count(), 2);
    }

    #[test]
    fn test_regular_links_untouched() {
        let html = r#"<p><a href="./getting_started" rel="noopener noreferrer">Getting Started</a></p>"#;

        assert_eq!(decorate_heading_anchors(html), html);
    }

    #[test]
    fn test_non_empty_anchor_untouched() {
        let html = r##"<a href="#x" aria-hidden="true" class="anchor" id="x">text</a>"##;

        assert_eq!(decorate_heading_anchors(html), html);
    }
}
