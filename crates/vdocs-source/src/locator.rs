//! Source locators.
//!
//! A [`Locator`] says where the raw bytes of a document live. The three
//! backing stores (working directory, commit snapshot, release archive) are
//! all reduced to either a file path or an HTTPS URL, so fetching and
//! rendering never need to branch on the version kind.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use url::Url;

use crate::version::VersionInfo;

/// Raw content host serving commit snapshots.
const PREVIEW_BASE: &str = "https://raw.githubusercontent.com/denoland/manual";

/// Registry host serving release archives.
const REGISTRY_BASE: &str = "https://deno.land/x";

/// Module name of releases in the old repository layout.
const OLD_REPO_MODULE: &str = "deno";

/// Module name of releases in the current repository layout.
const MODULE: &str = "manual";

/// Location of raw document bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Locator {
    /// Absolute path on the local filesystem.
    File(PathBuf),
    /// Absolute HTTPS URL.
    Http(Url),
}

impl Locator {
    /// Compute the locator of `path` for `version`.
    ///
    /// Local sources are resolved against the process working directory.
    /// Returns `None` if the path cannot be normalized, or if the version is
    /// local and `local_enabled` is false.
    #[must_use]
    pub fn resolve(version: &VersionInfo, path: &str, local_enabled: bool) -> Option<Self> {
        let local_root = if local_enabled {
            std::env::current_dir().ok()
        } else {
            None
        };
        Self::resolve_with_root(version, path, local_root.as_deref())
    }

    /// Compute the locator of `path` for `version` with an explicit local root.
    ///
    /// `local_root` grants access to local sources: with `None`, local
    /// versions never resolve.
    #[must_use]
    pub fn resolve_with_root(
        version: &VersionInfo,
        path: &str,
        local_root: Option<&Path>,
    ) -> Option<Self> {
        let normalized = normalize_url_path(path)?;

        match version {
            VersionInfo::Local => {
                let root = local_root?;
                local_file(root, &normalized).map(Self::File)
            }
            VersionInfo::Preview { version } => {
                Url::parse(&format!("{PREVIEW_BASE}/{version}{normalized}"))
                    .ok()
                    .map(Self::Http)
            }
            VersionInfo::Release {
                version,
                in_old_repo,
            } => {
                let url = if *in_old_repo {
                    format!("{REGISTRY_BASE}/{OLD_REPO_MODULE}@v{version}/docs{normalized}")
                } else {
                    format!("{REGISTRY_BASE}/{MODULE}@v{version}{normalized}")
                };
                Url::parse(&url).ok().map(Self::Http)
            }
        }
    }

    /// Backend identifier used in error messages.
    #[must_use]
    pub fn backend(&self) -> &'static str {
        match self {
            Self::File(_) => "Fs",
            Self::Http(_) => "Http",
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => match Url::from_file_path(path) {
                Ok(url) => f.write_str(url.as_str()),
                Err(()) => write!(f, "{}", path.display()),
            },
            Self::Http(url) => f.write_str(url.as_str()),
        }
    }
}

/// Normalize a path for use in a URL.
///
/// The path is resolved like the path component of a `file:///` URL:
/// `.` and `..` segments are collapsed (never above the root) and spaces and
/// other reserved characters are percent-encoded. The result always starts
/// with `/`.
///
/// # Examples
///
/// ```
/// use vdocs_source::normalize_url_path;
///
/// assert_eq!(normalize_url_path("/foo/../bar").as_deref(), Some("/bar"));
/// assert_eq!(normalize_url_path("/foo bar").as_deref(), Some("/foo%20bar"));
/// assert_eq!(normalize_url_path("").as_deref(), Some("/"));
/// ```
#[must_use]
pub fn normalize_url_path(path: &str) -> Option<String> {
    let mut url = Url::parse("file:///").ok()?;
    url.set_path(path);
    Some(url.path().to_owned())
}

/// Join a normalized URL path onto a local root directory.
///
/// Percent-encoded separators could smuggle `..` segments past URL
/// normalization, so the decoded path is rejected if it contains any.
fn local_file(root: &Path, normalized: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(normalized.trim_start_matches('/'))
        .decode_utf8()
        .ok()?;
    let relative = Path::new(decoded.as_ref());
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return None;
    }
    Some(root.join(relative))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const HASH: &str = "b54017ffac827d1b6be1f33955c055aac75610a1";

    fn release(version: &str, in_old_repo: bool) -> VersionInfo {
        VersionInfo::Release {
            version: version.to_owned(),
            in_old_repo,
        }
    }

    fn http(version: &VersionInfo, path: &str) -> Option<String> {
        Locator::resolve(version, path, false).map(|l| l.to_string())
    }

    #[test]
    fn test_normalize_url_path() {
        let cases = [
            ("/", "/"),
            ("", "/"),
            ("/foo", "/foo"),
            ("/../foo", "/foo"),
            ("/foo/bar", "/foo/bar"),
            ("/foo/../bar", "/bar"),
            ("/foo/./bar", "/foo/bar"),
            ("/foo bar", "/foo%20bar"),
            ("https://deno.land", "/https://deno.land"),
            ("introduction.md", "/introduction.md"),
            ("../../../etc/passwd", "/etc/passwd"),
        ];
        for (input, expected) in cases {
            assert_eq!(
                normalize_url_path(input).as_deref(),
                Some(expected),
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn test_normalize_url_path_encodes_query_and_fragment() {
        assert_eq!(normalize_url_path("/a?b#c").as_deref(), Some("/a%3Fb%23c"));
    }

    #[test]
    fn test_preview_url() {
        let version = VersionInfo::Preview {
            version: HASH.to_owned(),
        };

        assert_eq!(
            http(&version, "introduction.md").as_deref(),
            Some(
                "https://raw.githubusercontent.com/denoland/manual/b54017ffac827d1b6be1f33955c055aac75610a1/introduction.md"
            )
        );
    }

    #[test]
    fn test_release_old_repo_url() {
        assert_eq!(
            http(&release("1.0.0", true), "introduction.md").as_deref(),
            Some("https://deno.land/x/deno@v1.0.0/docs/introduction.md")
        );
    }

    #[test]
    fn test_release_old_repo_prerelease_url() {
        assert_eq!(
            http(&release("1.0.0-rc2", true), "introduction.md").as_deref(),
            Some("https://deno.land/x/deno@v1.0.0-rc2/docs/introduction.md")
        );
    }

    #[test]
    fn test_release_url() {
        assert_eq!(
            http(&release("1.12.1", false), "introduction.md").as_deref(),
            Some("https://deno.land/x/manual@v1.12.1/introduction.md")
        );
    }

    #[test]
    fn test_release_url_traversal_is_collapsed() {
        assert_eq!(
            http(&release("1.12.1", false), "../introduction.md").as_deref(),
            Some("https://deno.land/x/manual@v1.12.1/introduction.md")
        );
    }

    #[test]
    fn test_release_url_nested() {
        assert_eq!(
            http(&release("1.12.1", false), "/getting_started/installation.md").as_deref(),
            Some("https://deno.land/x/manual@v1.12.1/getting_started/installation.md")
        );
    }

    #[test]
    fn test_local_disabled() {
        assert_eq!(Locator::resolve(&VersionInfo::Local, "introduction.md", false), None);
        assert_eq!(
            Locator::resolve_with_root(&VersionInfo::Local, "introduction.md", None),
            None
        );
    }

    #[test]
    fn test_local_enabled() {
        let locator = Locator::resolve(&VersionInfo::Local, "introduction.md", true).unwrap();

        let Locator::File(path) = &locator else {
            panic!("expected file locator, got {locator:?}");
        };
        assert!(path.is_absolute());
        assert!(path.ends_with("introduction.md"));
        assert!(locator.to_string().starts_with("file://"));
        assert_eq!(locator.backend(), "Fs");
    }

    #[test]
    fn test_local_with_root_decodes_path() {
        let root = Path::new("/srv/docs");
        let locator =
            Locator::resolve_with_root(&VersionInfo::Local, "/getting started.md", Some(root));

        assert_eq!(
            locator,
            Some(Locator::File(PathBuf::from("/srv/docs/getting started.md")))
        );
    }

    #[test]
    fn test_local_rejects_encoded_traversal() {
        let root = Path::new("/srv/docs");
        let locator = Locator::resolve_with_root(
            &VersionInfo::Local,
            "a%2F..%2F..%2Fetc%2Fpasswd",
            Some(root),
        );

        assert_eq!(locator, None);
    }

    #[test]
    fn test_local_root_path() {
        let root = Path::new("/srv/docs");
        let locator = Locator::resolve_with_root(&VersionInfo::Local, "", Some(root));

        assert_eq!(locator, Some(Locator::File(PathBuf::from("/srv/docs"))));
    }
}
