//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`SETLIST_ROOT_FOLDER`)
//! 3. TOML config file (`root_folder` key)
//! 4. OS-dependent compiled default (fallback)
//!
//! Other settings follow the same order minus the environment step, which
//! the binaries already cover through clap's `env` support.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "SETLIST_ROOT_FOLDER";

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_DATABASE_FILE: &str = "setlist.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of the optional TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub database_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Load `path`. A missing file yields `None`; a malformed one is an error.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// Values supplied on the command line (or through clap `env` fallbacks)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub log_level: String,
}

impl ServerConfig {
    /// Merge command-line values, the TOML file and compiled defaults.
    ///
    /// A missing config file is not an error: defaults are used instead.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let config_path = overrides.config_file.clone().or_else(default_config_file);
        let toml = match &config_path {
            Some(path) => match TomlConfig::load(path)? {
                Some(config) => {
                    info!("Loaded config file: {}", path.display());
                    config
                }
                None => {
                    warn!("Config file not found: {} (using defaults)", path.display());
                    TomlConfig::default()
                }
            },
            None => TomlConfig::default(),
        };

        let root_folder = resolve_root_folder(
            overrides.root_folder.as_deref(),
            ROOT_FOLDER_ENV,
            toml.root_folder.as_deref(),
        );
        let database_file = toml
            .database_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE));

        Ok(Self {
            database_path: root_folder.join(database_file),
            root_folder,
            bind_address: overrides
                .bind_address
                .or(toml.bind_address)
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            log_level: overrides
                .log_level
                .or(toml.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// Address the HTTP server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| {
                Error::Config(format!(
                    "Invalid bind address {}:{}: {}",
                    self.bind_address, self.port, e
                ))
            })
    }
}

/// Resolve the root folder: CLI argument, environment variable, TOML value,
/// then the OS default.
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&Path>,
) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = toml_value {
        return path.to_path_buf();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Platform config file: `<config dir>/setlist/config.toml`
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("setlist").join("config.toml"))
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\setlist
        dirs::data_local_dir()
            .map(|d| d.join("setlist"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\setlist"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/setlist
        dirs::data_dir()
            .map(|d| d.join("setlist"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/setlist"))
    } else {
        // ~/.local/share/setlist
        dirs::data_local_dir()
            .map(|d| d.join("setlist"))
            .unwrap_or_else(|| PathBuf::from("./setlist_data"))
    }
}
