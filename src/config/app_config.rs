use std::env;
use std::io::ErrorKind;
use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::model::{ProbeConfig, ServerConfig};
use crate::http_probe::prelude::ProbeOptions;

const DEFAULT_CONFIG_FILE: &str = "config.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid listen address {address:?}: {source}")]
    ListenAddress {
        address: String,
        #[source]
        source: AddrParseError,
    },
}

/// Resolved, ready to use server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub listen_address: SocketAddr,
    pub shutdown_grace_period: Duration,
    pub probe: ProbeOptions,
}

impl TryFrom<ServerConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(config: ServerConfig) -> Result<Self, Self::Error> {
        let listen_address =
            config
                .listen_address
                .parse()
                .map_err(|source| ConfigError::ListenAddress {
                    address: config.listen_address.clone(),
                    source,
                })?;

        Ok(AppConfig {
            listen_address,
            shutdown_grace_period: Duration::from_secs(config.shutdown_grace_period_seconds),
            probe: config.probe.into(),
        })
    }
}

impl From<ProbeConfig> for ProbeOptions {
    fn from(config: ProbeConfig) -> Self {
        ProbeOptions {
            timeout: config.timeout_seconds.map(Duration::from_secs),
            follow_redirects: config.follow_redirects,
            user_agent: config.user_agent,
        }
    }
}

/// Load the server configuration from a YAML file and environment variables.
///
/// The file is `config_file` when given, else the `CONFIG_FILE` environment
/// variable, else `config.yml`. Only the implicit `config.yml` may be missing,
/// in which case the built-in defaults are used. `LISTEN_ADDRESS` overrides the
/// listen address from the file.
///
/// Call `dotenvy::dotenv()` beforehand to pick up variables from a `.env` file.
pub fn load_config(config_file: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let explicit = config_file
        .map(Path::to_path_buf)
        .or_else(|| env::var_os("CONFIG_FILE").map(PathBuf::from));

    let mut config = match explicit {
        Some(path) => read_config_file(&path)?,
        None => match read_config_file(Path::new(DEFAULT_CONFIG_FILE)) {
            Err(ConfigError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::info!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                ServerConfig::default()
            }
            other => other?,
        },
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok());
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<ServerConfig, ConfigError> {
    let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config = serde_yaml::from_str(&config_str).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), "Loaded configuration file");
    Ok(config)
}

fn apply_env_overrides(config: &mut ServerConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(address) = lookup("LISTEN_ADDRESS") {
        config.listen_address = address.trim().to_string();
    }
}
