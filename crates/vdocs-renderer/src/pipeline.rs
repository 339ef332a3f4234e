//! Markdown to HTML rendering.

use comrak::{Arena, Options};

use crate::anchors::decorate_heading_anchors;
use crate::links::rewrite_source_links;
use crate::sanitize::Sanitizer;
use crate::summary::summarize;

/// Result of rendering a documentation page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    /// Sanitized HTML body.
    pub html: String,
    /// Plain-text teaser, `None` if the page has no prose.
    pub summary: Option<String>,
}

/// GitHub-flavored markdown renderer producing safe HTML.
///
/// Rendering runs in four steps:
///
/// 1. Parse with tables, strikethrough, autolinks, task lists and heading ids
/// 2. Strip `.md` from relative link targets
/// 3. Sanitize the HTML with [`Sanitizer`]
/// 4. Decorate heading anchors with a link icon
///
/// Raw HTML in the source is passed to the sanitizer instead of being
/// escaped, so allowed markup survives and everything else is removed.
///
/// The pipeline is `Send + Sync` and is shared by concurrent requests.
/// comrak options hold a non-thread-safe callback slot, so they are built
/// per render instead of being stored.
///
/// # Example
///
/// ```
/// use vdocs_renderer::MarkdownPipeline;
///
/// let pipeline = MarkdownPipeline::new();
/// let html = pipeline.render("See [installation](./installation.md).");
/// assert!(html.contains(r#"href="./installation""#));
/// ```
pub struct MarkdownPipeline {
    sanitizer: Sanitizer,
}

impl MarkdownPipeline {
    /// Create a pipeline with the documentation allowlist.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sanitizer(Sanitizer::new())
    }

    /// Create a pipeline with a custom sanitizer.
    #[must_use]
    pub fn with_sanitizer(sanitizer: Sanitizer) -> Self {
        Self { sanitizer }
    }

    /// Render markdown to sanitized HTML.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let options = comrak_options();
        let arena = Arena::new();
        let root = comrak::parse_document(&arena, markdown, &options);
        rewrite_source_links(root);

        let mut html = Vec::with_capacity(markdown.len() * 2);
        // Writing into a Vec cannot fail.
        let _ = comrak::format_html(root, &options, &mut html);

        let clean = self.sanitizer.clean(&String::from_utf8_lossy(&html));
        decorate_heading_anchors(&clean)
    }

    /// Render markdown and extract its summary.
    #[must_use]
    pub fn render_page(&self, markdown: &str) -> RenderedPage {
        RenderedPage {
            html: self.render(markdown),
            summary: summarize(markdown),
        }
    }
}

impl Default for MarkdownPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse and render options: GFM extensions, heading ids, raw HTML kept.
fn comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.autolink = true;
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.header_ids = Some(String::new());
    options.render.unsafe_ = true;
    options
}
