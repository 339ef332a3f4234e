//! `vdocs serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use vdocs_config::{CliSettings, Config};
use vdocs_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover vdocs.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Serve the `local` version from the configured directory.
    #[arg(long)]
    local: bool,

    /// Serve the `local` version from this directory (implies --local).
    #[arg(long, value_name = "DIR")]
    local_root: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            local_enabled: self.local.then_some(true),
            local_root: self.local_root,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.highlight(&format!(
            "Starting server on http://{}:{}",
            config.server.host, config.server.port
        ));
        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        match config.source_resolved.enabled_local_root() {
            Some(root) => output.info(&format!("Local sources: {}", root.display())),
            None => output.info("Local sources: disabled"),
        }
        output.info(&format!(
            "Source timeout: {}s",
            config.source_resolved.timeout_secs
        ));
        if config.std_versions.latest.is_none() && config.std_versions.releases.is_empty() {
            output.warning("No [std_versions] configured: $STD_VERSION is left as-is");
        }

        let server_config = server_config_from_config(&config);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
