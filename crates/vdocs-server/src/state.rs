//! Application state.

use vdocs_site::Site;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Documentation site for page and file lookups.
    pub(crate) site: Site,
}
