//! Trailing slash redirects.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

/// Redirect `/foo/` to `/foo`, keeping the query string.
pub(crate) async fn redirect_trailing_slash(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if path.len() > 1
        && let Some(trimmed) = path.strip_suffix('/')
    {
        // A leading "//" would make the location protocol-relative.
        let trimmed = format!("/{}", trimmed.trim_start_matches('/'));
        let location = match request.uri().query() {
            Some(query) => format!("{trimmed}?{query}"),
            None => trimmed,
        };
        return Redirect::permanent(&location).into_response();
    }
    next.run(request).await
}
