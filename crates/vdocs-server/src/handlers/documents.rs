//! Documentation endpoint.
//!
//! `GET /{version}/{*path}` serves either a rendered page or a raw file:
//! extensionless paths are pages and return JSON with metadata, navigation
//! and HTML content, paths with an extension return the source file.

use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use md5::{Digest, Md5};
use serde::Serialize;
use vdocs_site::{NavItem, Page, RawFile, navigation, render_toc};
use vdocs_source::{VersionInfo, normalize_url_path};

use crate::error::ServerError;
use crate::handlers::{Canonical, canonical_version, with_query};
use crate::state::AppState;

/// Response for a rendered page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageResponse {
    /// Page metadata.
    meta: PageMeta,
    /// Navigation entries with the current page marked active.
    toc: Vec<NavItem>,
    /// Navigation rendered as HTML.
    nav_html: String,
    /// Rendered HTML content.
    content: String,
}

/// Page metadata.
#[derive(Serialize)]
struct PageMeta {
    /// Document title.
    title: String,
    /// Page name from the table of contents.
    name: String,
    /// Plain-text summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    /// Logical page path.
    path: String,
    /// Version the page was served from.
    version: VersionMeta,
}

/// Version information for display.
#[derive(Serialize)]
struct VersionMeta {
    /// `release`, `preview` or `local`.
    kind: &'static str,
    /// Human-readable label (`Release`, `Commit`, `Local`).
    label: &'static str,
    /// Short identifier (`v1.12.1`, abbreviated hash, `dev`).
    identifier: String,
    /// Canonical version string.
    version: String,
}

impl From<&VersionInfo> for VersionMeta {
    fn from(version: &VersionInfo) -> Self {
        Self {
            kind: version.kind(),
            label: version.label(),
            identifier: version.identifier(),
            version: version.version().to_owned(),
        }
    }
}

impl From<Page> for PageResponse {
    fn from(page: Page) -> Self {
        let version = page.version.version();
        let toc = navigation(&page.toc, version, Some(&page.path));
        let nav_html = render_toc(&page.toc, version, &page.path);
        Self {
            meta: PageMeta {
                title: page.title,
                name: page.name,
                summary: page.summary,
                version: VersionMeta::from(&page.version),
                path: page.path,
            },
            toc,
            nav_html,
            content: page.html,
        }
    }
}

/// Handle GET /{version}.
pub(crate) async fn get_version_root(
    Path(version): Path<String>,
    RawQuery(query): RawQuery,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_document_impl(version, String::new(), query, state, &headers).await
}

/// Handle GET /{version}/{*path}.
pub(crate) async fn get_document(
    Path((version, path)): Path<(String, String)>,
    RawQuery(query): RawQuery,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_document_impl(version, path, query, state, &headers).await
}

async fn get_document_impl(
    token: String,
    path: String,
    query: Option<String>,
    state: Arc<AppState>,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let logical = normalize_url_path(&path).ok_or_else(|| ServerError::NotFound(path.clone()))?;

    let version = match canonical_version(&token, |canonical| {
        let target = if path.is_empty() {
            format!("/{canonical}")
        } else {
            format!("/{canonical}{logical}")
        };
        with_query(target, query.as_deref())
    })? {
        Canonical::Version(version) => version,
        Canonical::Redirect(response) => return Ok(response),
    };

    if path.is_empty() {
        return Err(ServerError::NotFound(logical));
    }

    if has_extension(&logical) {
        let raw = tokio::task::spawn_blocking(move || state.site.raw(&token, &logical)).await??;
        return Ok(raw_response(raw));
    }

    let page = tokio::task::spawn_blocking(move || state.site.page(&token, &logical)).await??;
    page_response(&version, page, headers)
}

/// Build the JSON page response with conditional request support.
fn page_response(
    version: &VersionInfo,
    page: Page,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let body = serde_json::to_string(&PageResponse::from(page))?;
    let etag = compute_etag(version.version(), &body);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_owned()),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        body,
    )
        .into_response())
}

/// Build the raw file response with a content type guessed from the path.
fn raw_response(raw: RawFile) -> Response {
    let mime = mime_guess::from_path(&raw.path).first_or_octet_stream();
    let content_type = if mime.type_() == mime_guess::mime::TEXT {
        format!("{}; charset=utf-8", mime.essence_str())
    } else {
        mime.essence_str().to_owned()
    };
    let content_type = HeaderValue::from_str(&content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    ([(header::CONTENT_TYPE, content_type)], raw.content).into_response()
}

/// Check whether the last path segment has a file extension.
fn has_extension(path: &str) -> bool {
    std::path::Path::new(path).extension().is_some()
}

/// Compute `ETag` from version and response body.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
