//! Mock fetcher implementation for testing.
//!
//! Provides [`MockFetcher`] for unit testing without network or filesystem
//! access.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{FetchError, FetchErrorKind};
use crate::fetch::Fetcher;
use crate::locator::Locator;

/// Canned response for a locator.
#[derive(Debug)]
enum MockResponse {
    Content(Vec<u8>),
    Status(u16),
}

/// Mock fetcher for testing.
///
/// Responses are keyed by the locator's URL form (`https://...` or
/// `file://...`). Unknown locators are reported as not found.
///
/// # Example
///
/// ```ignore
/// use vdocs_source::{Fetcher, Locator, MockFetcher, normalize_version};
///
/// let fetcher = MockFetcher::new()
///     .with_content("https://deno.land/x/manual@v1.12.1/toc.json", "{}");
///
/// let version = normalize_version("1.12.1").unwrap();
/// let locator = Locator::resolve(&version, "/toc.json", false).unwrap();
/// assert!(fetcher.fetch(&locator).unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: RwLock<HashMap<String, MockResponse>>,
    requests: RwLock<Vec<String>>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for the locator URL `url`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_content(self, url: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Content(content.into()));
        self
    }

    /// Answer the locator URL `url` with an HTTP status.
    ///
    /// Status 404 is reported as not found, any other status as an error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(url.into(), MockResponse::Status(status));
        self
    }

    /// Locator URLs fetched so far, in request order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.read().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, locator: &Locator) -> Result<Option<Vec<u8>>, FetchError> {
        let key = locator.to_string();
        self.requests.write().unwrap().push(key.clone());

        match self.responses.read().unwrap().get(&key) {
            Some(MockResponse::Content(bytes)) => Ok(Some(bytes.clone())),
            Some(MockResponse::Status(404)) | None => Ok(None),
            Some(MockResponse::Status(status)) => {
                Err(FetchError::new(FetchErrorKind::HttpStatus(*status))
                    .with_backend("Mock")
                    .with_locator(key))
            }
        }
    }
}
