//! Markdown decoding, rendering and sanitization for versioned documentation.
//!
//! Source bytes are first decoded with [`decode_markdown`], which substitutes
//! version placeholders. [`MarkdownPipeline`] then turns the markdown into
//! sanitized HTML and a plain-text summary.
//!
//! # Example
//!
//! ```
//! use vdocs_renderer::{MarkdownPipeline, Placeholders, StdVersions, decode_markdown};
//! use vdocs_source::VersionInfo;
//!
//! let version = VersionInfo::Local;
//! let placeholders = Placeholders::for_version(&version, &StdVersions::default());
//! let markdown = decode_markdown(b"# Install $CLI_VERSION", &placeholders).unwrap();
//!
//! let page = MarkdownPipeline::new().render_page(&markdown);
//! assert!(page.html.contains("Install vlocal"));
//! ```

mod anchors;
mod decode;
mod links;
mod pipeline;
mod sanitize;
mod summary;

pub use anchors::{OCTICON_SVG, decorate_heading_anchors};
pub use decode::{
    CLI_VERSION_PLACEHOLDER, DecodeError, Placeholders, STD_VERSION_PLACEHOLDER, StdVersions,
    decode_markdown,
};
pub use pipeline::{MarkdownPipeline, RenderedPage};
pub use sanitize::{Sanitizer, sanitize_text};
pub use summary::summarize;
