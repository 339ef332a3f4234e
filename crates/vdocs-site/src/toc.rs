//! Table of contents manifest.
//!
//! Every documentation version ships a `toc.json` manifest describing its
//! pages in a two-level hierarchy:
//!
//! ```json
//! {
//!   "introduction": { "name": "Introduction" },
//!   "runtime": {
//!     "name": "The Runtime",
//!     "children": { "permissions": "Permissions" }
//!   }
//! }
//! ```
//!
//! Keys are URL slugs, values carry the display name. Manifest order is the
//! navigation order.

use std::path::Path;

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use vdocs_source::{Fetcher, VersionInfo, fetch_source, normalize_url_path};

use crate::error::SiteError;

/// Path of the manifest relative to the documentation root.
pub const TOC_PATH: &str = "/toc.json";

/// Top-level manifest entry.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TocSection {
    /// Display name.
    pub name: String,
    /// Child slug to display name.
    #[serde(default)]
    pub children: IndexMap<String, String>,
}

/// Top-level item of a table of contents listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocItem {
    /// Display name.
    pub name: String,
    /// Section slug, the first URL path segment.
    pub slug: String,
    /// Child pages in manifest order.
    pub children: Vec<TocChild>,
}

/// Second-level item of a table of contents listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocChild {
    /// Display name.
    pub name: String,
    /// Child slug, the second URL path segment.
    pub slug: String,
}

/// Ordered two-level table of contents for one documentation version.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableOfContents {
    sections: IndexMap<String, TocSection>,
}

impl TableOfContents {
    /// Build a table of contents from parsed sections.
    #[must_use]
    pub fn from_sections(sections: IndexMap<String, TocSection>) -> Self {
        Self { sections }
    }

    /// Parse a `toc.json` manifest.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Manifest` if the manifest is not valid JSON or does
    /// not follow the two-level schema.
    pub fn from_json(json: &str) -> Result<Self, SiteError> {
        let sections = serde_json::from_str(json)?;
        Ok(Self::from_sections(sections))
    }

    /// Fetch and parse the manifest for `version`.
    ///
    /// Returns `Ok(None)` if the version has no manifest.
    ///
    /// # Errors
    ///
    /// Returns `SiteError::Transport` if the manifest cannot be fetched,
    /// `SiteError::Decode` if it is not UTF-8 and `SiteError::Manifest` if it
    /// cannot be parsed.
    pub fn load(
        fetcher: &dyn Fetcher,
        version: &VersionInfo,
        local_root: Option<&Path>,
    ) -> Result<Option<Self>, SiteError> {
        let Some(bytes) = fetch_source(fetcher, version, TOC_PATH, local_root)? else {
            return Ok(None);
        };
        let json = std::str::from_utf8(&bytes).map_err(vdocs_renderer::DecodeError::from)?;
        Self::from_json(json).map(Some)
    }

    /// Display name of the page at `path`.
    ///
    /// `path` is normalized first and its segments are percent-decoded, so
    /// the slug `"a b"` is found at `/a b` and `/a%20b` alike. One segment
    /// names a section, two segments name a child of that section. Anything
    /// else has no name.
    #[must_use]
    pub fn get_name(&self, path: &str) -> Option<&str> {
        let normalized = normalize_url_path(path)?;
        let segments = normalized
            .strip_prefix('/')
            .unwrap_or(&normalized)
            .split('/')
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy())
            .collect::<Vec<_>>();

        match segments.as_slice() {
            [section] => self.sections.get(section.as_ref()).map(|s| s.name.as_str()),
            [section, child] => self
                .sections
                .get(section.as_ref())?
                .children
                .get(child.as_ref())
                .map(String::as_str),
            _ => None,
        }
    }

    /// List sections and their children in manifest order.
    #[must_use]
    pub fn list_items(&self) -> Vec<TocItem> {
        self.sections
            .iter()
            .map(|(slug, section)| TocItem {
                name: section.name.clone(),
                slug: slug.clone(),
                children: section
                    .children
                    .iter()
                    .map(|(slug, name)| TocChild {
                        name: name.clone(),
                        slug: slug.clone(),
                    })
                    .collect(),
            })
            .collect()
    }
}
