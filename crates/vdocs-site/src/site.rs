//! Versioned page assembly.
//!
//! [`Site`] ties the pieces together: it resolves the version token, fetches
//! sources through a [`Fetcher`], looks pages up in the table of contents and
//! renders them with a shared [`MarkdownPipeline`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use vdocs_renderer::{MarkdownPipeline, Placeholders, StdVersions, decode_markdown};
use vdocs_source::{Fetcher, VersionInfo, fetch_source, normalize_url_path, normalize_version};

use crate::error::SiteError;
use crate::toc::TableOfContents;

/// Extension of markdown sources.
const MARKDOWN_EXTENSION: &str = "md";

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Root directory for the `local` version.
    ///
    /// If `None`, local sources are disabled.
    pub local_root: Option<PathBuf>,
    /// Standard library versions substituted for `$STD_VERSION`.
    pub std_versions: StdVersions,
    /// Site title appended to page names.
    pub title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            local_root: None,
            std_versions: StdVersions::default(),
            title: "Documentation".to_owned(),
        }
    }
}

/// Rendered documentation page.
#[derive(Clone, Debug)]
pub struct Page {
    /// Version the page was served from.
    pub version: VersionInfo,
    /// Normalized logical path (e.g. "/runtime/permissions").
    pub path: String,
    /// Page name from the table of contents.
    pub name: String,
    /// Document title, `"<name> | <site title>"`.
    pub title: String,
    /// Sanitized HTML body.
    pub html: String,
    /// Plain-text summary.
    pub summary: Option<String>,
    /// Table of contents of the version.
    pub toc: TableOfContents,
}

/// Raw source file.
#[derive(Clone, Debug)]
pub struct RawFile {
    /// Normalized path of the file.
    pub path: String,
    /// File content. Markdown sources have placeholders substituted.
    pub content: Vec<u8>,
}

/// Documentation site over a content fetcher.
///
/// `Site` holds no mutable state and can be shared across threads behind an
/// `Arc`.
pub struct Site {
    fetcher: Arc<dyn Fetcher>,
    config: SiteConfig,
    pipeline: MarkdownPipeline,
}

impl Site {
    /// Create a site with the documentation rendering pipeline.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>, config: SiteConfig) -> Self {
        Self {
            fetcher,
            config,
            pipeline: MarkdownPipeline::new(),
        }
    }

    /// Resolve a version token.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::InvalidVersion` if the token cannot be parsed.
    pub fn resolve_version(&self, token: &str) -> Result<VersionInfo, SiteError> {
        normalize_version(token).ok_or_else(|| SiteError::InvalidVersion(token.to_owned()))
    }

    /// Placeholder values for `version`.
    #[must_use]
    pub fn placeholders(&self, version: &VersionInfo) -> Placeholders {
        Placeholders::for_version(version, &self.config.std_versions)
    }

    /// Render the page at the extensionless `path`.
    ///
    /// The markdown source and the table of contents are fetched concurrently.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::NotFound` if the source or the table of contents is
    /// missing or the table of contents does not name the page. Fetch, decode
    /// and manifest failures are propagated.
    pub fn page(&self, version_token: &str, path: &str) -> Result<Page, SiteError> {
        let version = self.resolve_version(version_token)?;
        let normalized = normalize_url_path(path).ok_or_else(|| not_found(path))?;
        let source_path = format!("{normalized}.{MARKDOWN_EXTENSION}");

        tracing::debug!(version = %version, path = %normalized, "Rendering page");

        let fetcher = self.fetcher.as_ref();
        let local_root = self.local_root();
        let (source, toc) = rayon::join(
            || fetch_source(fetcher, &version, &source_path, local_root),
            || TableOfContents::load(fetcher, &version, local_root),
        );
        let source = source?.ok_or_else(|| not_found(&source_path))?;
        let toc = toc?.ok_or_else(|| not_found(crate::toc::TOC_PATH))?;

        let name = toc
            .get_name(&normalized)
            .ok_or_else(|| not_found(&normalized))?
            .to_owned();

        let text = decode_markdown(&source, &self.placeholders(&version))?;
        let rendered = self.pipeline.render_page(&text);
        let title = format!("{name} | {}", self.config.title);

        Ok(Page {
            version,
            path: normalized,
            name,
            title,
            html: rendered.html,
            summary: rendered.summary,
            toc,
        })
    }

    /// Fetch the raw file at `path`.
    ///
    /// Markdown sources are decoded and have their placeholders substituted.
    /// Other files are returned as-is.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::NotFound` if the file is missing and
    /// `SiteError::Decode` if a markdown source is not UTF-8.
    pub fn raw(&self, version_token: &str, path: &str) -> Result<RawFile, SiteError> {
        let version = self.resolve_version(version_token)?;
        let normalized = normalize_url_path(path).ok_or_else(|| not_found(path))?;

        tracing::debug!(version = %version, path = %normalized, "Serving raw file");

        let content = fetch_source(self.fetcher.as_ref(), &version, &normalized, self.local_root())?
            .ok_or_else(|| not_found(&normalized))?;

        let content = if is_markdown(&normalized) {
            decode_markdown(&content, &self.placeholders(&version))?.into_bytes()
        } else {
            content
        };

        Ok(RawFile {
            path: normalized,
            content,
        })
    }

    /// Load the table of contents of a version.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::NotFound` if the version has no manifest.
    pub fn toc(&self, version_token: &str) -> Result<TableOfContents, SiteError> {
        let version = self.resolve_version(version_token)?;
        TableOfContents::load(self.fetcher.as_ref(), &version, self.local_root())?
            .ok_or_else(|| not_found(crate::toc::TOC_PATH))
    }

    fn local_root(&self) -> Option<&Path> {
        self.config.local_root.as_deref()
    }
}

fn not_found(path: &str) -> SiteError {
    SiteError::NotFound(path.to_owned())
}

fn is_markdown(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext == MARKDOWN_EXTENSION)
}
