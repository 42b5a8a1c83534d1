//! Upstream API access layer: session token lifecycle, a preconfigured HTTP
//! client with normalized errors, and typed repositories for the auth,
//! settings and projects endpoints.

pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use domain::{ApiConfig, ApiError, ApiErrorKind, ExecutionContext};
pub use interface_adapters::http::{ApiClient, ApiRequest, ClientBuildError};
pub use use_cases::bootstrap::{BootstrapOutcome, BootstrapUseCase, SessionBootstrap};
pub use use_cases::token_store::TokenStore;
