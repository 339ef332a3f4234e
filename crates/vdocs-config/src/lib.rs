//! Configuration management for vdocs.
//!
//! Parses `vdocs.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `source.local_root`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override local sources flag.
    pub local_enabled: Option<bool>,
    /// Override local sources directory.
    pub local_root: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "vdocs.toml";

/// Default timeout for remote sources in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Upper bound for `source.timeout_secs`.
const MAX_TIMEOUT_SECS: u64 = 600;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Source configuration (paths are relative strings from TOML).
    source: SourceConfigRaw,
    /// Site presentation configuration.
    pub site: SiteConfig,
    /// Standard library versions for `$STD_VERSION`.
    pub std_versions: StdVersionsConfig,

    /// Resolved source configuration (set after loading).
    #[serde(skip)]
    pub source_resolved: SourceConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
        }
    }
}

/// Raw source configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SourceConfigRaw {
    local_enabled: Option<bool>,
    local_root: Option<String>,
    timeout_secs: Option<u64>,
}

/// Resolved source configuration with absolute paths.
#[derive(Debug)]
pub struct SourceConfig {
    /// Whether the `local` version is served.
    pub local_enabled: bool,
    /// Directory the `local` version is read from.
    pub local_root: PathBuf,
    /// Timeout for remote source requests.
    pub timeout_secs: u64,
}

impl SourceConfig {
    /// Local root if local sources are enabled.
    #[must_use]
    pub fn enabled_local_root(&self) -> Option<&Path> {
        self.local_enabled.then_some(self.local_root.as_path())
    }

    /// Timeout for remote source requests.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_root: PathBuf::from("."),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Site presentation configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Title appended to page names.
    pub title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Documentation".to_owned(),
        }
    }
}

/// Standard library versions paired with releases.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StdVersionsConfig {
    /// Used for versions without a pinned entry.
    pub latest: Option<String>,
    /// Release version (e.g. "1.12.1") to standard library version.
    pub releases: BTreeMap<String, String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`VDOCS_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `vdocs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(local_enabled) = settings.local_enabled {
            self.source_resolved.local_enabled = local_enabled;
        }
        if let Some(local_root) = &settings.local_root {
            self.source_resolved.local_root.clone_from(local_root);
            self.source_resolved.local_enabled = true;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            source: SourceConfigRaw::default(),
            site: SiteConfig::default(),
            std_versions: StdVersionsConfig::default(),
            source_resolved: SourceConfig {
                local_root: base.to_path_buf(),
                ..SourceConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_source()?;
        self.validate_std_versions()?;
        require_non_empty(&self.site.title, "site.title")?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 lets the OS pick a port, which is unlikely in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_source(&self) -> Result<(), ConfigError> {
        let timeout = self.source_resolved.timeout_secs;
        if timeout == 0 {
            return Err(ConfigError::Validation(
                "source.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if timeout > MAX_TIMEOUT_SECS {
            return Err(ConfigError::Validation(format!(
                "source.timeout_secs cannot exceed {MAX_TIMEOUT_SECS}"
            )));
        }
        Ok(())
    }

    fn validate_std_versions(&self) -> Result<(), ConfigError> {
        if let Some(latest) = &self.std_versions.latest {
            require_non_empty(latest, "std_versions.latest")?;
        }
        for (release, std_version) in &self.std_versions.releases {
            require_non_empty(std_version, &format!("std_versions.releases.\"{release}\""))?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref root) = self.source.local_root {
            self.source.local_root = Some(expand::expand_env(root, "source.local_root")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.source_resolved = SourceConfig {
            local_enabled: self.source.local_enabled.unwrap_or(false),
            local_root: config_dir.join(self.source.local_root.as_deref().unwrap_or(".")),
            timeout_secs: self.source.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert!(!config.source_resolved.local_enabled);
        assert_eq!(config.source_resolved.local_root, PathBuf::from("/test"));
        assert_eq!(config.source_resolved.timeout(), Duration::from_secs(30));
        assert_eq!(config.site.title, "Documentation");
        assert!(config.std_versions.latest.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000

[source]
local_enabled = true
local_root = "manual"
timeout_secs = 10

[site]
title = "Deno Manual"

[std_versions]
latest = "0.110.0"

[std_versions.releases]
"1.12.1" = "0.102.0"
"1.13.0" = "0.104.0"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(config.source_resolved.local_enabled);
        assert_eq!(
            config.source_resolved.local_root,
            PathBuf::from("/project/manual")
        );
        assert_eq!(config.source_resolved.timeout_secs, 10);
        assert_eq!(config.site.title, "Deno Manual");
        assert_eq!(config.std_versions.latest.as_deref(), Some("0.110.0"));
        assert_eq!(
            config.std_versions.releases.get("1.12.1").map(String::as_str),
            Some("0.102.0")
        );
        assert_eq!(config.std_versions.releases.len(), 2);
    }

    #[test]
    fn test_enabled_local_root() {
        let mut config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.source_resolved.enabled_local_root(), None);

        config.source_resolved.local_enabled = true;

        assert_eq!(
            config.source_resolved.enabled_local_root(),
            Some(Path::new("/test"))
        );
    }

    #[test]
    fn test_apply_cli_settings_host_and_port() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            host: Some("0.0.0.0".to_owned()),
            port: Some(9000),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert!(!config.source_resolved.local_enabled);
    }

    #[test]
    fn test_apply_cli_settings_local_root_enables_local() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            local_root: Some(PathBuf::from("/manual")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.source_resolved.enabled_local_root(),
            Some(Path::new("/manual"))
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert!(!config.source_resolved.local_enabled);
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("VDOCS_TEST_CONFIG_HOST", "0.0.0.0");
            std::env::remove_var("VDOCS_TEST_CONFIG_ROOT");
        }
        let toml = r#"
[server]
host = "${VDOCS_TEST_CONFIG_HOST}"

[source]
local_root = "${VDOCS_TEST_CONFIG_ROOT:-docs}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.source_resolved.local_root,
            PathBuf::from("/project/docs")
        );
        unsafe {
            std::env::remove_var("VDOCS_TEST_CONFIG_HOST");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("VDOCS_TEST_CONFIG_MISSING");
        }
        let toml = r#"
[server]
host = "${VDOCS_TEST_CONFIG_MISSING}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();

        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "server.host"));
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;

        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let mut config = Config::default_with_base(Path::new("/test"));

        config.source_resolved.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.source_resolved.timeout_secs = 601;
        assert!(config.validate().is_err());

        config.source_resolved.timeout_secs = 600;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_std_version() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config
            .std_versions
            .releases
            .insert("1.12.1".to_owned(), String::new());

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("std_versions.releases"));
    }

    #[test]
    fn test_validate_empty_title() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.site.title = " ".to_owned();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vdocs.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9100\n\n[source]\nlocal_enabled = true\nlocal_root = \"manual\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(
            config.source_resolved.enabled_local_root(),
            Some(dir.path().join("manual").as_path())
        );
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = Config::load(Some(Path::new("/nonexistent/vdocs.toml")), None);

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vdocs.toml");
        std::fs::write(&path, "[server\nport = 1").unwrap();

        let result = Config::load(Some(&path), None);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_cli_settings_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vdocs.toml");
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            port: Some(0),
            ..Default::default()
        };

        let result = Config::load(Some(&path), Some(&settings));

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
