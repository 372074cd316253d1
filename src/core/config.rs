//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.cloud-install/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! The resolved [`Config`] also carries the runtime phase flags
//! (`deploy_complete`, `relations_complete`, `postproc_complete`). The
//! deployment controller flips those while it works; the UI only reads them.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::wizard::InstallType;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InstallerConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub maas: MaasConfig,
    #[serde(default)]
    pub landscape: LandscapeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub headless: Option<bool>,
    pub openstack_release: Option<String>,
    pub install_type: Option<InstallType>,
    pub openstack_password: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MaasConfig {
    pub server: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LandscapeConfig {
    pub admin_email: Option<String>,
    pub admin_name: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
    pub level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const CONFIG_DIR_NAME: &str = ".cloud-install";
pub const DEFAULT_LOG_FILE_NAME: &str = "commands.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values where a default exists)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub headless: bool,
    pub openstack_release: Option<String>,
    pub install_type: Option<InstallType>,
    pub openstack_password: Option<String>,
    pub maas_server: Option<String>,
    pub maas_api_key: Option<String>,
    pub landscape_admin_email: Option<String>,
    pub landscape_admin_name: Option<String>,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub deploy_complete: bool,
    pub relations_complete: bool,
    pub postproc_complete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            headless: false,
            openstack_release: None,
            install_type: None,
            openstack_password: None,
            maas_server: None,
            maas_api_key: None,
            landscape_admin_email: None,
            landscape_admin_name: None,
            log_file: default_log_file(),
            log_level: DEFAULT_LOG_LEVEL,
            deploy_complete: false,
            relations_complete: false,
            postproc_complete: false,
        }
    }
}

impl Config {
    /// A config for runs without a terminal.
    pub fn headless() -> Self {
        Self {
            headless: true,
            ..Default::default()
        }
    }
}

/// Values given on the command line. `None`/`false` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub headless: bool,
    pub openstack_release: Option<String>,
    pub install_type: Option<InstallType>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(toml::de::Error),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "config I/O error ({}): {e}", path.display()),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Invalid { key, value } => write!(f, "invalid value for {key}: {value:?}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.cloud-install`, the home of the config file and logs.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME))
}

/// Returns the path to `~/.cloud-install/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

fn default_log_file() -> PathBuf {
    config_dir()
        .map(|d| d.join(DEFAULT_LOG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_NAME))
}

/// Load the installer config.
///
/// An explicit `path` must exist. Without one, `~/.cloud-install/config.toml`
/// is used; if that doesn't exist a commented-out default is generated and
/// `InstallerConfig::default()` is returned.
pub fn load_config(path: Option<&Path>) -> Result<(InstallerConfig, ConfigSource), ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) if p.exists() => p,
            Some(p) => {
                let error = generate_default_config(&p).err();
                let source = ConfigSource::GeneratedDefault { path: p, error };
                return Ok((InstallerConfig::default(), source));
            }
            None => return Ok((InstallerConfig::default(), ConfigSource::NoHomeDir)),
        },
    };

    let contents = fs::read_to_string(&path).map_err(|e| ConfigError::Io(path.clone(), e))?;
    let config = parse_config(&contents)?;
    Ok((config, ConfigSource::File(path)))
}

/// Where [`load_config`] got its settings. Config is read before the log
/// file is known, so the caller reports this once logging is up.
#[derive(Debug)]
pub enum ConfigSource {
    File(PathBuf),
    /// No file existed; a commented-out default was written unless `error`.
    GeneratedDefault {
        path: PathBuf,
        error: Option<std::io::Error>,
    },
    NoHomeDir,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::GeneratedDefault { error: Some(_), .. } | ConfigSource::NoHomeDir => {
                warn!("{self}")
            }
            _ => info!("{self}"),
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "Loaded config from {}", path.display()),
            ConfigSource::GeneratedDefault { path, error: None } => {
                write!(f, "No config file found, generated default at {}", path.display())
            }
            ConfigSource::GeneratedDefault { path, error: Some(e) } => {
                write!(f, "Failed to write default config to {}: {e}", path.display())
            }
            ConfigSource::NoHomeDir => {
                write!(f, "Could not determine home directory, using default config")
            }
        }
    }
}

pub fn parse_config(contents: &str) -> Result<InstallerConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) -> std::io::Result<()> {
    let default_content = r#"# Cloud installer configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# headless = false                  # Or set CLOUD_INSTALL_HEADLESS=1
# openstack_release = "kilo"        # Or set OPENSTACK_RELEASE
# install_type = "multi"            # "single", "multi" or "landscape"
# openstack_password = "..."        # Or set OPENSTACK_PASSWORD

# [maas]
# server = "10.0.0.5"
# api_key = "..."

# [landscape]
# admin_email = "admin@example.com"
# admin_name = "Cloud Admin"

# [logging]
# file = "/home/ubuntu/.cloud-install/commands.log"
# level = "debug"                   # "error", "warn", "info", "debug", "trace"
"#;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_content)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &InstallerConfig, cli: &CliOverrides) -> Result<Config, ConfigError> {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &InstallerConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    // Headless: CLI flag → env → config → default
    let headless = if cli.headless {
        true
    } else if let Some(value) = env("CLOUD_INSTALL_HEADLESS") {
        parse_bool(&value).ok_or(ConfigError::Invalid {
            key: "CLOUD_INSTALL_HEADLESS",
            value,
        })?
    } else {
        config.general.headless.unwrap_or(false)
    };

    let openstack_release = cli
        .openstack_release
        .clone()
        .or_else(|| env("OPENSTACK_RELEASE"))
        .or_else(|| config.general.openstack_release.clone());

    let openstack_password = env("OPENSTACK_PASSWORD")
        .or_else(|| config.general.openstack_password.clone());

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| env("CLOUD_INSTALL_LOG_FILE").map(PathBuf::from))
        .or_else(|| config.logging.file.clone())
        .unwrap_or_else(default_log_file);

    let log_level = match cli
        .log_level
        .clone()
        .map(|v| ("--log-level", v))
        .or_else(|| env("CLOUD_INSTALL_LOG_LEVEL").map(|v| ("CLOUD_INSTALL_LOG_LEVEL", v)))
        .or_else(|| config.logging.level.clone().map(|v| ("logging.level", v)))
    {
        Some((key, value)) => value
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::Invalid { key, value })?,
        None => DEFAULT_LOG_LEVEL,
    };

    let resolved = Config {
        headless,
        openstack_release,
        install_type: cli.install_type.or(config.general.install_type),
        openstack_password,
        maas_server: config.maas.server.clone(),
        maas_api_key: config.maas.api_key.clone(),
        landscape_admin_email: config.landscape.admin_email.clone(),
        landscape_admin_name: config.landscape.admin_name.clone(),
        log_file,
        log_level,
        ..Default::default()
    };
    debug!(
        "Resolved config: headless={}, release={:?}, install_type={:?}",
        resolved.headless, resolved.openstack_release, resolved.install_type
    );
    Ok(resolved)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
