//! Error type for site operations.

use vdocs_renderer::DecodeError;
use vdocs_source::FetchError;

/// Error returned when a page, file or table of contents cannot be served.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Version token is neither `local`, a commit hash nor a semver version.
    #[error("Invalid version: {0}")]
    InvalidVersion(String),
    /// Source, table of contents or page name does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Source could not be fetched.
    #[error(transparent)]
    Transport(#[from] FetchError),
    /// Source is not valid UTF-8.
    #[error("Invalid source encoding: {0}")]
    Decode(#[from] DecodeError),
    /// Table of contents is not a valid manifest.
    #[error("Invalid table of contents: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl SiteError {
    /// Check whether the error should be reported to clients as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::InvalidVersion(_) | Self::NotFound(_))
    }
}
