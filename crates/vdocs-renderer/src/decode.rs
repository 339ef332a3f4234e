//! Source decoding and placeholder substitution.
//!
//! Markdown sources may reference the version they are served under through
//! two placeholders:
//!
//! - `$CLI_VERSION` - replaced with `v<version>`
//! - `$STD_VERSION` - replaced with the standard library release paired
//!   with that version
//!
//! Substitution is a plain substring replacement over the whole text,
//! including code blocks.

use std::collections::BTreeMap;
use std::str::Utf8Error;

use vdocs_source::VersionInfo;

/// Placeholder for the CLI version.
pub const CLI_VERSION_PLACEHOLDER: &str = "$CLI_VERSION";

/// Placeholder for the standard library version.
pub const STD_VERSION_PLACEHOLDER: &str = "$STD_VERSION";

/// Error returned when source bytes are not valid UTF-8.
#[derive(Debug, thiserror::Error)]
#[error("source is not valid UTF-8")]
pub struct DecodeError(#[from] Utf8Error);

/// Standard library versions paired with CLI releases.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StdVersions {
    /// Release version (e.g. "1.12.1") to standard library version.
    pub releases: BTreeMap<String, String>,
    /// Fallback for releases without an entry, previews and local sources.
    pub latest: Option<String>,
}

impl StdVersions {
    /// Standard library version for `version`, if known.
    #[must_use]
    pub fn resolve(&self, version: &VersionInfo) -> Option<&str> {
        let pinned = match version {
            VersionInfo::Release { version, .. } => self.releases.get(version),
            VersionInfo::Preview { .. } | VersionInfo::Local => None,
        };
        pinned.or(self.latest.as_ref()).map(String::as_str)
    }
}

/// Values substituted for placeholders in a decoded source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholders {
    /// Replacement for `$CLI_VERSION`.
    pub cli_version: String,
    /// Replacement for `$STD_VERSION`; `None` leaves the placeholder verbatim.
    pub std_version: Option<String>,
}

impl Placeholders {
    /// Placeholder values for `version`.
    #[must_use]
    pub fn for_version(version: &VersionInfo, std_versions: &StdVersions) -> Self {
        Self {
            cli_version: format!("v{}", version.version()),
            std_version: std_versions.resolve(version).map(ToOwned::to_owned),
        }
    }

    /// Replace all placeholders in `text`.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let text = text.replace(CLI_VERSION_PLACEHOLDER, &self.cli_version);
        match &self.std_version {
            Some(std_version) => text.replace(STD_VERSION_PLACEHOLDER, std_version),
            None => text,
        }
    }
}

/// Decode markdown source bytes and substitute placeholders.
///
/// # Errors
///
/// Returns [`DecodeError`] if `source` is not valid UTF-8.
pub fn decode_markdown(source: &[u8], placeholders: &Placeholders) -> Result<String, DecodeError> {
    let text = std::str::from_utf8(source)?;
    Ok(placeholders.apply(text))
}
