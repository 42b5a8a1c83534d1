use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_HEADER_LOCALE: &str = "X-LOCALE";
pub const DEFAULT_TOKEN_KEY: &str = "token";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_RETRY: u32 = 1;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

// The exchange credential always lives under this cookie name.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Process-wide client settings. Built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Upstream base URL; request paths are appended to it.
    pub base_url: String,
    /// Header name used to forward the caller's locale.
    pub header_locale: String,
    pub enable: bool,
    /// Cookie name holding the session token.
    pub token_key: String,
    /// Where a navigation-capable context is sent after a 401.
    pub login_path: String,
    /// Extra attempts after the first one for transient failures.
    pub retry: u32,
    pub retry_delay_ms: u64,
    /// Per-attempt timeout; `0` means the default.
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            header_locale: DEFAULT_HEADER_LOCALE.to_string(),
            enable: true,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            retry: DEFAULT_RETRY,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        match self.timeout_ms {
            0 => Duration::from_millis(DEFAULT_TIMEOUT_MS),
            ms => Duration::from_millis(ms),
        }
    }
}
