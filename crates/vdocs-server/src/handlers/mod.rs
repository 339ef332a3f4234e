//! HTTP request handlers.

pub(crate) mod documents;
pub(crate) mod navigation;

use axum::response::{IntoResponse, Redirect, Response};
use vdocs_source::{VersionInfo, normalize_version};

use crate::error::ServerError;

/// Outcome of resolving a version token from the URL.
pub(crate) enum Canonical {
    /// Token is already canonical.
    Version(VersionInfo),
    /// Token must be replaced by its canonical form.
    Redirect(Response),
}

/// Resolve a version token, redirecting non-canonical tokens.
///
/// `location` builds the redirect target from the canonical version.
pub(crate) fn canonical_version(
    token: &str,
    location: impl FnOnce(&str) -> String,
) -> Result<Canonical, ServerError> {
    let version =
        normalize_version(token).ok_or_else(|| ServerError::InvalidVersion(token.to_owned()))?;
    if version.version() == token {
        return Ok(Canonical::Version(version));
    }
    let target = location(version.version());
    tracing::debug!(from = %token, to = %target, "Redirecting to canonical version");
    Ok(Canonical::Redirect(
        Redirect::permanent(&target).into_response(),
    ))
}

/// Append the request query string to a redirect target.
pub(crate) fn with_query(target: String, query: Option<&str>) -> String {
    match query {
        Some(query) if !query.is_empty() => format!("{target}?{query}"),
        _ => target,
    }
}
