use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::error;

use crate::domain::{AuthApi, Setting, SettingsApi};
use crate::use_cases::bootstrap::{BootstrapOutcome, SessionBootstrap};

// Result of app initialization: session state plus the preloaded settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSession {
    pub outcome: BootstrapOutcome,
    pub settings: Option<Setting>,
}

/// Bootstraps the session, then preloads settings once.
///
/// Settings that failed to load are not cached, so the next call tries again.
pub struct AppInitializer<A, S> {
    bootstrap: Arc<SessionBootstrap<A>>,
    settings_api: S,
    settings: Mutex<Option<Setting>>,
}

impl<A, S> AppInitializer<A, S>
where
    A: AuthApi,
    S: SettingsApi,
{
    pub fn new(bootstrap: Arc<SessionBootstrap<A>>, settings_api: S) -> Self {
        Self {
            bootstrap,
            settings_api,
            settings: Mutex::new(None),
        }
    }

    #[tracing::instrument(name = "app_init", skip_all)]
    pub async fn initialize(&self) -> AppSession {
        let outcome = self.bootstrap.ensure().await;

        // Held across the fetch so concurrent callers don't load twice.
        let mut settings = self.settings.lock().await;
        if settings.is_none() {
            match self.settings_api.get_settings().await {
                Ok(loaded) => *settings = Some(loaded),
                Err(error) => error!(%error, "app initialization failed"),
            }
        }

        AppSession {
            outcome,
            settings: settings.clone(),
        }
    }

    pub async fn settings(&self) -> Option<Setting> {
        self.settings.lock().await.clone()
    }
}
