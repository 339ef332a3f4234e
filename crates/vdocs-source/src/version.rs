//! Version token parsing.
//!
//! A version token is the first URL segment of every documentation request.
//! It selects which snapshot of the documentation is served:
//!
//! - `"local"` - the working directory of the server process
//! - a 40 character lowercase commit hash - a preview of an arbitrary commit
//! - a semantic version (optionally prefixed with `v`) - a tagged release
//!
//! [`normalize_version`] turns a token into a [`VersionInfo`]. The resolver
//! never redirects: callers compare [`VersionInfo::version`] with the token
//! they received and redirect to the canonical form when they differ.

use std::fmt;

use semver::{BuildMetadata, Version};

/// Literal token selecting local sources.
pub const LOCAL_VERSION: &str = "local";

/// Length of a full git commit hash.
const COMMIT_HASH_LEN: usize = 40;

/// Last release whose docs lived in the old repository layout (inclusive).
const LAST_OLD_REPO_RELEASE: Version = Version::new(1, 12, 0);

/// Resolved documentation version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VersionInfo {
    /// Tagged release.
    Release {
        /// Cleaned semantic version (e.g. "1.12.1").
        version: String,
        /// Whether the release docs live in the old repository layout.
        in_old_repo: bool,
    },
    /// Snapshot pinned to a commit hash.
    Preview {
        /// Full 40 character commit hash.
        version: String,
    },
    /// Working directory of the server process.
    Local,
}

impl VersionInfo {
    /// Create a release version, deriving the repository layout from the version.
    #[must_use]
    pub fn release(version: &Version) -> Self {
        let mut cleaned = version.clone();
        cleaned.build = BuildMetadata::EMPTY;
        let in_old_repo = cleaned <= LAST_OLD_REPO_RELEASE;
        Self::Release {
            version: cleaned.to_string(),
            in_old_repo,
        }
    }

    /// Version string, usable verbatim in URLs.
    #[must_use]
    pub fn version(&self) -> &str {
        match self {
            Self::Release { version, .. } | Self::Preview { version } => version,
            Self::Local => LOCAL_VERSION,
        }
    }

    /// Machine-readable kind ("release", "preview" or "local").
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Release { .. } => "release",
            Self::Preview { .. } => "preview",
            Self::Local => "local",
        }
    }

    /// Human-readable label for the version kind.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Release { .. } => "Release",
            Self::Preview { .. } => "Commit",
            Self::Local => "Local",
        }
    }

    /// Short identifier shown next to the label.
    ///
    /// Releases are shown as `v1.12.1`, previews as the abbreviated commit hash.
    #[must_use]
    pub fn identifier(&self) -> String {
        match self {
            Self::Release { version, .. } => format!("v{version}"),
            Self::Preview { version } => version.chars().take(12).collect(),
            Self::Local => "dev".to_owned(),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version())
    }
}

/// Parse a raw version token.
///
/// Returns `None` for anything that is neither `"local"`, a lowercase
/// 40 character commit hash, nor a parseable semantic version.
///
/// # Examples
///
/// ```
/// use vdocs_source::{VersionInfo, normalize_version};
///
/// assert_eq!(
///     normalize_version("v1.12.1"),
///     Some(VersionInfo::Release { version: "1.12.1".to_owned(), in_old_repo: false })
/// );
/// assert_eq!(normalize_version("a.0.0"), None);
/// ```
#[must_use]
pub fn normalize_version(token: &str) -> Option<VersionInfo> {
    if token == LOCAL_VERSION {
        return Some(VersionInfo::Local);
    }
    if is_commit_hash(token) {
        return Some(VersionInfo::Preview {
            version: token.to_owned(),
        });
    }
    clean_semver(token).map(|version| VersionInfo::release(&version))
}

/// Check for exactly 40 lowercase hexadecimal characters.
fn is_commit_hash(token: &str) -> bool {
    token.len() == COMMIT_HASH_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Parse a semantic version, accepting surrounding whitespace and leading `v`/`=`.
fn clean_semver(token: &str) -> Option<Version> {
    let trimmed = token.trim().trim_start_matches(['=', 'v']);
    Version::parse(trimmed).ok()
}
