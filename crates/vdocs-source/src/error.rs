//! Fetch error types.
//!
//! "Not found" is not an error: fetchers return `Ok(None)` for missing
//! content. [`FetchError`] covers everything else that prevents reading a
//! source (permission problems, unexpected HTTP statuses, network failures).

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchErrorKind {
    /// Permission denied reading a local file.
    PermissionDenied,
    /// Remote origin answered with a status other than 200 or 404.
    HttpStatus(u16),
    /// Remote origin could not be reached.
    Unavailable,
    /// Operation timed out.
    Timeout,
    /// Other/unknown error category.
    Other,
}

/// Fetch error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct FetchError {
    /// Semantic error category.
    pub kind: FetchErrorKind,
    /// Locator context (file path or URL), if applicable.
    pub locator: Option<String>,
    /// Backend identifier (e.g., "Fs", "Http", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FetchError {
    /// Create a new fetch error.
    #[must_use]
    pub fn new(kind: FetchErrorKind) -> Self {
        Self {
            kind,
            locator: None,
            backend: None,
            source: None,
        }
    }

    /// Attach locator context.
    #[must_use]
    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create an error for an unexpected HTTP status.
    #[must_use]
    pub fn http_status(status: u16) -> Self {
        Self::new(FetchErrorKind::HttpStatus(status))
    }

    /// Create a fetch error from an I/O error.
    ///
    /// Missing files are handled by the caller before this point, so
    /// `NotFound` maps to [`FetchErrorKind::Other`] here.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::PermissionDenied => FetchErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => FetchErrorKind::Timeout,
            _ => FetchErrorKind::Other,
        };
        Self::new(kind).with_source(err)
    }

    /// Create a fetch error from an HTTP client error.
    #[must_use]
    pub fn transport(err: ureq::Error) -> Self {
        let kind = match &err {
            ureq::Error::StatusCode(status) => FetchErrorKind::HttpStatus(*status),
            ureq::Error::Timeout(_) => FetchErrorKind::Timeout,
            ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
                FetchErrorKind::Unavailable
            }
            ureq::Error::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => {
                FetchErrorKind::Timeout
            }
            _ => FetchErrorKind::Other,
        };
        Self::new(kind).with_source(err)
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (locator: https://...)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        match self.kind {
            FetchErrorKind::PermissionDenied => write!(f, "Permission denied")?,
            FetchErrorKind::HttpStatus(status) => write!(f, "Unexpected HTTP status {status}")?,
            FetchErrorKind::Unavailable => write!(f, "Unavailable")?,
            FetchErrorKind::Timeout => write!(f, "Timeout")?,
            FetchErrorKind::Other => write!(f, "Error")?,
        }

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(locator) = &self.locator {
            write!(f, " (locator: {locator})")?;
        }

        Ok(())
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}
