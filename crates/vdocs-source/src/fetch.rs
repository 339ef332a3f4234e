//! Content fetching.
//!
//! Provides the [`Fetcher`] trait that retrieves the raw bytes behind a
//! [`Locator`], and [`SourceFetcher`], the production implementation that
//! reads local files and issues HTTP GET requests through a shared `ureq`
//! agent.

use std::io;
use std::path::Path;
use std::time::Duration;

use ureq::Agent;
use url::Url;

use crate::error::FetchError;
use crate::locator::Locator;
use crate::version::VersionInfo;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Retrieves raw bytes for a locator.
///
/// Implementations distinguish three outcomes:
///
/// - `Ok(Some(bytes))` - content found
/// - `Ok(None)` - content does not exist (missing file, HTTP 404)
/// - `Err(_)` - content could not be read
pub trait Fetcher: Send + Sync {
    /// Fetch the bytes behind `locator`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] for I/O errors other than a missing file and for
    /// HTTP responses other than 200 and 404.
    fn fetch(&self, locator: &Locator) -> Result<Option<Vec<u8>>, FetchError>;
}

/// Resolve `path` for `version` and fetch it.
///
/// A path that does not resolve to a locator (unparsable, or local access not
/// granted) is reported as not found.
///
/// # Errors
///
/// Propagates [`FetchError`] from the fetcher.
pub fn fetch_source(
    fetcher: &dyn Fetcher,
    version: &VersionInfo,
    path: &str,
    local_root: Option<&Path>,
) -> Result<Option<Vec<u8>>, FetchError> {
    match Locator::resolve_with_root(version, path, local_root) {
        Some(locator) => fetcher.fetch(&locator),
        None => Ok(None),
    }
}

/// Fetcher for local files and HTTPS origins.
///
/// The HTTP agent is shared across requests for connection pooling.
pub struct SourceFetcher {
    agent: Agent,
}

impl SourceFetcher {
    /// Create a fetcher with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT))
    }

    /// Create a fetcher with a global per-request timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }

    fn read_file(path: &Path) -> Result<Option<Vec<u8>>, FetchError> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(FetchError::io(err)
                .with_backend("Fs")
                .with_locator(path.display().to_string())),
        }
    }

    fn get(&self, url: &Url) -> Result<Option<Vec<u8>>, FetchError> {
        let context = |err: FetchError| err.with_backend("Http").with_locator(url.as_str());

        let mut response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|e| context(FetchError::transport(e)))?;

        let status = response.status().as_u16();
        if status != 200 {
            // Drain the body so the connection can return to the pool.
            let _ = io::copy(&mut response.body_mut().as_reader(), &mut io::sink());
            if status == 404 {
                return Ok(None);
            }
            return Err(context(FetchError::http_status(status)));
        }

        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| context(FetchError::transport(e)))?;
        Ok(Some(bytes))
    }
}

impl Default for SourceFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for SourceFetcher {
    fn fetch(&self, locator: &Locator) -> Result<Option<Vec<u8>>, FetchError> {
        match locator {
            Locator::File(path) => Self::read_file(path),
            Locator::Http(url) => self.get(url),
        }
    }
}
