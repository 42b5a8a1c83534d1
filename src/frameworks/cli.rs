use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::ExecutionContext;
use crate::frameworks::{config, telemetry};
use crate::interface_adapters::cookies::FileCookieJar;
use crate::interface_adapters::http::ApiClient;
use crate::interface_adapters::navigation::LogNavigator;
use crate::interface_adapters::repositories::{
    AuthRepository, ProjectsRepository, SettingsRepository,
};
use crate::use_cases::app_init::AppInitializer;
use crate::use_cases::bootstrap::{BootstrapUseCase, SessionBootstrap};
use crate::use_cases::token_store::TokenStore;

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let config = match config::load() {
        Ok(config) => config,
        Err(error) => {
            error!(%error, "invalid configuration");
            return;
        }
    };
    if !config.enable {
        info!("api client disabled");
        return;
    }
    tracing::debug!(base_url = %config.base_url, "api client configured.");

    // Cookies persist in a file so the session outlives the process.
    let jar = FileCookieJar::new(config::cookie_file());
    info!(path = %jar.path().display(), "using cookie file");
    let config = Arc::new(config);
    let tokens = Arc::new(TokenStore::new(Arc::new(jar), config.token_key.clone()));

    let mut context = ExecutionContext::default();
    if let Some(locale) = config::locale() {
        context = context.with_locale(locale);
    }

    let api = match ApiClient::new(config.clone(), tokens.clone(), context, Arc::new(LogNavigator)) {
        Ok(api) => api,
        Err(error) => {
            error!(%error, "failed to build api client");
            return;
        }
    };

    let bootstrap = Arc::new(SessionBootstrap::new(BootstrapUseCase {
        auth: AuthRepository::new(api.clone()),
        tokens,
    }));
    let init = AppInitializer::new(bootstrap, SettingsRepository::new(api.clone()));
    let session = init.initialize().await;
    info!(
        outcome = ?session.outcome,
        settings_loaded = session.settings.is_some(),
        "session ready"
    );

    if !session.outcome.is_authenticated() {
        return;
    }

    match ProjectsRepository::new(api).list_projects().await {
        Ok(projects) => info!(count = projects.len(), "projects listed"),
        Err(error) => warn!(%error, status = error.status_code(), "failed to list projects"),
    }
}
