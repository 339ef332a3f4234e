//! `vdocs render` command implementation.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use vdocs_config::{CliSettings, Config};
use vdocs_server::std_versions_from_config;
use vdocs_site::{Site, SiteConfig};
use vdocs_source::SourceFetcher;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Version token (`local`, a release such as `1.12.1`, or a commit hash).
    version: String,

    /// Page path (e.g. `getting_started/installation`).
    path: String,

    /// Path to configuration file (default: auto-discover vdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read the `local` version from this directory.
    #[arg(long, value_name = "DIR")]
    local_root: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// Prints the page title and summary to stderr and the HTML to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the page cannot be rendered.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            local_enabled: (self.version == vdocs_source::LOCAL_VERSION).then_some(true),
            local_root: self.local_root,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let site_config = SiteConfig {
            local_root: config
                .source_resolved
                .enabled_local_root()
                .map(std::path::Path::to_path_buf),
            std_versions: std_versions_from_config(&config.std_versions),
            title: config.site.title.clone(),
        };
        let fetcher = Arc::new(SourceFetcher::with_timeout(config.source_resolved.timeout()));
        let site = Site::new(fetcher, site_config);

        tracing::info!(version = %self.version, path = %self.path, "Rendering page");
        let page = site.page(&self.version, &self.path)?;

        output.highlight(&page.title);
        if let Some(summary) = &page.summary {
            output.info(summary);
        }

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(page.html.as_bytes())?;
        stdout.flush()?;

        Ok(())
    }
}
