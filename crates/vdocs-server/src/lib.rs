//! HTTP server for versioned documentation.
//!
//! This crate provides an axum HTTP server serving:
//! - Rendered pages as JSON at `/{version}/{*path}`
//! - Raw source files at `/{version}/{*path}` when the path has an extension
//! - Navigation at `/api/navigation/{version}`
//!
//! Version tokens that are not canonical (e.g. `v1.12.1`) are redirected to
//! their canonical form, as are paths with a trailing slash.
//!
//! # Quick Start
//!
//! ```ignore
//! use vdocs_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 8080,
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (vdocs-server)
//!                        │
//!                        └─► spawn_blocking ──► Site (vdocs-site)
//!                                                  │
//!                                                  ├─► Fetcher (local files, HTTPS)
//!                                                  └─► MarkdownPipeline
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use state::AppState;
use vdocs_renderer::StdVersions;
use vdocs_site::{Site, SiteConfig};
use vdocs_source::{DEFAULT_TIMEOUT, SourceFetcher};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory served as the `local` version (`None` disables it).
    pub local_root: Option<PathBuf>,
    /// Timeout for remote source requests.
    pub timeout: Duration,
    /// Site title appended to page names.
    pub title: String,
    /// Standard library versions for `$STD_VERSION`.
    pub std_versions: StdVersions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
            local_root: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            title: "Documentation".to_owned(),
            std_versions: StdVersions::default(),
        }
    }
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = Arc::new(SourceFetcher::with_timeout(config.timeout));
    let site_config = SiteConfig {
        local_root: config.local_root.clone(),
        std_versions: config.std_versions.clone(),
        title: config.title.clone(),
    };
    let state = Arc::new(AppState {
        site: Site::new(fetcher, site_config),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        local = config.local_root.is_some(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from vdocs config.
#[must_use]
pub fn server_config_from_config(config: &vdocs_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        local_root: config
            .source_resolved
            .enabled_local_root()
            .map(std::path::Path::to_path_buf),
        timeout: config.source_resolved.timeout(),
        title: config.site.title.clone(),
        std_versions: std_versions_from_config(&config.std_versions),
    }
}

/// Convert configured standard library versions.
#[must_use]
pub fn std_versions_from_config(config: &vdocs_config::StdVersionsConfig) -> StdVersions {
    StdVersions {
        releases: config.releases.clone(),
        latest: config.latest.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_server_config_from_default_config() {
        let config = vdocs_config::Config::default();

        let server_config = server_config_from_config(&config);

        assert_eq!(server_config.host, "127.0.0.1");
        assert_eq!(server_config.port, 8000);
        assert_eq!(server_config.local_root, None);
        assert_eq!(server_config.timeout, Duration::from_secs(30));
        assert_eq!(server_config.title, "Documentation");
    }

    #[test]
    fn test_std_versions_from_config() {
        let config = vdocs_config::StdVersionsConfig {
            latest: Some("0.110.0".to_owned()),
            releases: [("1.12.1".to_owned(), "0.102.0".to_owned())].into(),
        };

        let std_versions = std_versions_from_config(&config);

        assert_eq!(std_versions.latest.as_deref(), Some("0.110.0"));
        assert_eq!(
            std_versions.releases.get("1.12.1").map(String::as_str),
            Some("0.102.0")
        );
    }
}
