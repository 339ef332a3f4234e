//! Relative link rewriting.
//!
//! Documentation pages link to each other by their source file names
//! (`./getting_started.md`). Rendered pages are served without the extension,
//! so relative link targets lose their trailing `.md`.

use comrak::nodes::{AstNode, NodeValue};

/// Extension of markdown source documents.
pub(crate) const SOURCE_EXTENSION: &str = ".md";

/// Strip the source extension from every relative link below `root`.
pub(crate) fn rewrite_source_links<'a>(root: &'a AstNode<'a>) {
    for node in root.descendants() {
        if let NodeValue::Link(ref mut link) = node.data.borrow_mut().value
            && let Some(rewritten) = strip_source_extension(&link.url)
        {
            link.url = rewritten;
        }
    }
}

/// Rewrite a relative `foo.md` or `foo.md#bar` target, `None` if untouched.
pub(crate) fn strip_source_extension(url: &str) -> Option<String> {
    if !is_relative(url) {
        return None;
    }
    let (path, fragment) = match url.find('#') {
        Some(idx) => url.split_at(idx),
        None => (url, ""),
    };
    let stem = path.strip_suffix(SOURCE_EXTENSION)?;
    if stem.is_empty() || stem.ends_with('/') {
        return None;
    }
    Some(format!("{stem}{fragment}"))
}

/// Check that a link target has neither a scheme nor an authority.
fn is_relative(url: &str) -> bool {
    if url.starts_with("//") {
        return false;
    }
    // A scheme is ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) followed by ':'
    // before any '/', '?' or '#'.
    let head = url.split(['/', '?', '#']).next().unwrap_or_default();
    match head.split_once(':') {
        Some((scheme, _)) => !is_scheme(scheme),
        None => true,
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
