use async_trait::async_trait;

use crate::domain::entities::Setting;
use crate::domain::errors::{ApiError, CookieJarError};

// Port for the persisted client state (browser cookies, or a file for the CLI).
pub trait CookieJar: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>, CookieJarError>;
    fn set(&self, name: &str, value: &str) -> Result<(), CookieJarError>;
    fn remove(&self, name: &str) -> Result<(), CookieJarError>;
}

// Port for contexts that can send the user somewhere else (e.g. the login page).
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

// Port used by app initialization to preload settings.
#[async_trait]
pub trait SettingsApi: Send + Sync {
    async fn get_settings(&self) -> Result<Setting, ApiError>;
}
