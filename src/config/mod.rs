// Configuration module
//
// Configuration is read once at startup, either from the environment or
// from a YAML file with `${VAR}` substitution. Storage names have no
// defaults: a missing bucket or watermark key shows up as a failed fetch
// at request time, never as a startup error.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    ENV_BUCKET_NAME, ENV_LISTEN_ADDRESS, ENV_LISTEN_PORT, ENV_LOCAL_ASSET_ROOT, ENV_LOG_FORMAT,
    ENV_LOG_LEVEL, ENV_WATERMARK_IMAGE_NAME,
};

pub mod logging;
pub mod server;
pub mod storage;

pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use storage::StorageConfig;

/// `${VAR_NAME}` references inside YAML
const ENV_VAR_PATTERN: &str = r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    #[error("Invalid env substitution pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset storage variables become empty strings.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        config.storage.bucket_name = lookup(ENV_BUCKET_NAME).unwrap_or_default();
        config.storage.watermark_image_name = lookup(ENV_WATERMARK_IMAGE_NAME).unwrap_or_default();
        config.storage.local_root = lookup(ENV_LOCAL_ASSET_ROOT)
            .filter(|root| !root.is_empty())
            .map(PathBuf::from);

        if let Some(address) = lookup(ENV_LISTEN_ADDRESS) {
            config.server.address = address;
        }
        if let Some(port) = lookup(ENV_LISTEN_PORT) {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_LISTEN_PORT.to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.logging.level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.logging.format = format.parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_LOG_FORMAT.to_string(),
                value: format.clone(),
            })?;
        }

        Ok(config)
    }

    /// Parse YAML after substituting `${VAR}` references from the environment.
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        Self::from_yaml_with_lookup(yaml, |name| std::env::var(name).ok())
    }

    pub fn from_yaml_with_lookup<F>(yaml: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let substituted = substitute_env_vars(yaml, lookup)?;
        Ok(serde_yaml::from_str(&substituted)?)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_with_env(&contents)
    }

    /// Check settings that would prevent the process from starting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        self.logging.level.parse::<tracing_subscriber::EnvFilter>().map_err(|_| {
            ConfigError::InvalidValue {
                name: "logging.level".to_string(),
                value: self.logging.level.clone(),
            }
        })?;
        Ok(())
    }
}

/// Replace every `${VAR}` with its value. Fails on the first unset variable.
fn substitute_env_vars<F>(input: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(ENV_VAR_PATTERN)?;
    let mut output = String::with_capacity(input.len());
    let mut last = 0;

    for caps in re.captures_iter(input) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = lookup(name.as_str())
            .ok_or_else(|| ConfigError::MissingEnvVar(name.as_str().to_string()))?;
        output.push_str(&input[last..whole.start()]);
        output.push_str(&value);
        last = whole.end();
    }

    output.push_str(&input[last..]);
    Ok(output)
}
