use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};
use thiserror::Error;

use crate::domain::ApiConfig;

// Optional TOML file with the same fields as `ApiConfig`.
pub const CONFIG_FILE_VAR: &str = "API_CLIENT_CONFIG";
pub const COOKIE_FILE_VAR: &str = "API_COOKIE_FILE";
pub const LOCALE_VAR: &str = "API_LOCALE";
const DEFAULT_COOKIE_FILE: &str = ".api_client_cookies.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Load configuration from the process environment.
pub fn load() -> Result<ApiConfig, ConfigError> {
    load_from(|key| env::var(key).ok())
}

/// File layer first (when `API_CLIENT_CONFIG` is set), then environment overrides.
pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<ApiConfig, ConfigError> {
    let mut config = match lookup(CONFIG_FILE_VAR) {
        Some(path) => from_file(Path::new(&path))?,
        None => ApiConfig::default(),
    };

    if let Some(value) = lookup("API_BASE_URL") {
        config.base_url = value;
    }
    if let Some(value) = lookup("API_HEADER_LOCALE") {
        config.header_locale = value;
    }
    if let Some(value) = lookup("API_CLIENT_ENABLE") {
        config.enable = parse_flag("API_CLIENT_ENABLE", &value)?;
    }
    if let Some(value) = lookup("API_TOKEN_KEY") {
        config.token_key = value;
    }
    if let Some(value) = lookup("API_LOGIN_PATH") {
        config.login_path = value;
    }
    if let Some(value) = lookup("API_RETRY") {
        config.retry = parse("API_RETRY", &value)?;
    }
    if let Some(value) = lookup("API_RETRY_DELAY_MS") {
        config.retry_delay_ms = parse("API_RETRY_DELAY_MS", &value)?;
    }
    if let Some(value) = lookup("API_TIMEOUT_MS") {
        config.timeout_ms = parse("API_TIMEOUT_MS", &value)?;
    }

    Ok(config)
}

pub fn from_file(path: &Path) -> Result<ApiConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn cookie_file() -> PathBuf {
    env::var(COOKIE_FILE_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_COOKIE_FILE))
}

pub fn locale() -> Option<String> {
    env::var(LOCALE_VAR).ok().filter(|value| !value.is_empty())
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
