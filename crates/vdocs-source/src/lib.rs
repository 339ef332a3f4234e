//! Version resolution and content sources for vdocs.
//!
//! Every documentation request names a version token and a logical document
//! path. This crate turns the pair into raw bytes:
//!
//! - [`normalize_version`] parses the token into a [`VersionInfo`]
//! - [`Locator::resolve`] maps version + path to a local file or remote URL
//! - [`Fetcher`] retrieves the bytes, reporting missing content as `Ok(None)`
//!
//! # Architecture
//!
//! The crate provides:
//! - [`SourceFetcher`] for local files and HTTPS origins (`ureq`)
//! - [`MockFetcher`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use vdocs_source::{Fetcher, Locator, SourceFetcher, normalize_version};
//!
//! let version = normalize_version("v1.12.1").unwrap();
//! let locator = Locator::resolve(&version, "introduction.md", false).unwrap();
//! let bytes = SourceFetcher::new().fetch(&locator)?;
//! ```

mod error;
mod fetch;
mod locator;
#[cfg(feature = "mock")]
mod mock;
mod version;

pub use error::{FetchError, FetchErrorKind};
pub use fetch::{DEFAULT_TIMEOUT, Fetcher, SourceFetcher, fetch_source};
pub use locator::{Locator, normalize_url_path};
#[cfg(feature = "mock")]
pub use mock::MockFetcher;
pub use version::{LOCAL_VERSION, VersionInfo, normalize_version};
