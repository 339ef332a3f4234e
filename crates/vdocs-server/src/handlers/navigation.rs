//! Navigation API endpoint.
//!
//! Returns the navigation tree of a documentation version.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, RawQuery, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use vdocs_site::{NavItem, navigation};

use crate::error::ServerError;
use crate::handlers::{Canonical, canonical_version, with_query};
use crate::state::AppState;

/// Response for GET /api/navigation/{version}.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    /// Navigation tree items.
    items: Vec<NavItem>,
}

/// Handle GET /api/navigation/{version}.
pub(crate) async fn get_navigation(
    Path(token): Path<String>,
    RawQuery(query): RawQuery,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let version = match canonical_version(&token, |canonical| {
        with_query(format!("/api/navigation/{canonical}"), query.as_deref())
    })? {
        Canonical::Version(version) => version,
        Canonical::Redirect(response) => return Ok(response),
    };

    let toc = tokio::task::spawn_blocking(move || state.site.toc(&token)).await??;
    let items = navigation(&toc, version.version(), None);
    Ok(Json(NavigationResponse { items }).into_response())
}
