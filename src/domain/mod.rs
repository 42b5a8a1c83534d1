mod auth;
mod config;
mod context;
mod entities;
mod errors;
mod ports;

// Re-export the domain boundary types and ports.
pub use auth::{AuthApi, LoginRequest, LoginResponse, MeResponse, RegisterResponse};
pub use config::{
    ACCESS_TOKEN_KEY, ApiConfig, DEFAULT_HEADER_LOCALE, DEFAULT_LOGIN_PATH, DEFAULT_RETRY,
    DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS, DEFAULT_TOKEN_KEY,
};
pub use context::ExecutionContext;
pub use entities::{
    Project, ProjectNote, ProjectNoteStatus, ProjectStatus, ProjectTimeEntry, Setting, User,
};
pub use errors::{ApiError, ApiErrorKind, CookieJarError, FieldErrors, NO_STATUS};
pub use ports::{CookieJar, Navigator, SettingsApi};
