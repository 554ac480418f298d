//! User configuration for the glue utilities.
//!
//! Settings live in a TOML file, by default
//! `$XDG_CONFIG_HOME/dalloriam/config.toml`:
//!
//! ```toml
//! [api]
//! host = "127.0.0.1"
//! port = 8080
//! debug = false
//!
//! [orc]
//! port = 33000
//! check_liveness = true
//! startup_delay_secs = 2
//!
//! [datahose]
//! url = "https://hose.example.com/push"
//! password = "hunter2"
//!
//! [docker]
//! binary = "docker"
//! ```
//!
//! Every section is optional. `[api]` and `[datahose]` have no defaults and
//! stay `None` when absent.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use tracing::debug;

/// Errors from locating or reading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine the user config directory")]
    NoConfigDir,

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// `[api]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub debug: bool,
}

/// `[orc]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrcSettings {
    pub port: u16,
    pub check_liveness: bool,
    pub startup_delay_secs: u64,
}

impl Default for OrcSettings {
    fn default() -> Self {
        Self {
            port: 33000,
            check_liveness: true,
            startup_delay_secs: 2,
        }
    }
}

impl OrcSettings {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }
}

/// `[datahose]`
#[derive(Debug, Deserialize)]
pub struct DatahoseSettings {
    pub url: String,
    pub password: SecretString,
}

/// `[docker]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DockerSettings {
    pub binary: PathBuf,
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("docker"),
        }
    }
}

/// The whole config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub api: Option<ApiSettings>,
    pub orc: OrcSettings,
    pub datahose: Option<DatahoseSettings>,
    pub docker: DockerSettings,
}

impl UserConfig {
    /// `$XDG_CONFIG_HOME/dalloriam/config.toml` or the platform equivalent.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("dalloriam").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    pub fn from_toml(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse `path`, which must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &content)
    }

    /// Like [`UserConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
