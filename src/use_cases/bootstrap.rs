use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use crate::domain::{AuthApi, LoginRequest};
use crate::use_cases::token_store::TokenStore;

/// How the session ended up after bootstrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The stored session token was accepted by `/api/me`.
    Resumed,
    /// The access token was exchanged for a new session token.
    Exchanged,
    /// A fresh anonymous account was registered.
    Registered,
    /// Every stage failed; calls go out without credentials.
    Unauthenticated,
}

impl BootstrapOutcome {
    pub fn is_authenticated(self) -> bool {
        !matches!(self, BootstrapOutcome::Unauthenticated)
    }
}

// Session bootstrap use case with injected dependencies.
pub struct BootstrapUseCase<A> {
    pub auth: A,
    pub tokens: Arc<TokenStore>,
}

impl<A> BootstrapUseCase<A>
where
    A: AuthApi,
{
    /// Re-auth, then exchange, then auto-registration; each stage only runs when
    /// the previous one is unavailable or failed. Never fails: the worst case is
    /// an unauthenticated session.
    #[tracing::instrument(name = "session_bootstrap", skip_all)]
    pub async fn execute(&self) -> BootstrapOutcome {
        if self.tokens.token().is_some() {
            match self.auth.me().await {
                Ok(_) => {
                    debug!("stored session token accepted");
                    return BootstrapOutcome::Resumed;
                }
                Err(error) => {
                    info!(%error, "stored session token rejected");
                    self.tokens.set_token(None);
                }
            }
        }

        // A failed exchange leaves the access token in place, so the next
        // session tries it again.
        if let Some(access_token) = self.tokens.access_token() {
            match self.auth.login(LoginRequest { access_token }).await {
                Ok(token) if !token.is_empty() => {
                    self.tokens.set_token(Some(token));
                    info!("session token obtained from access token");
                    return BootstrapOutcome::Exchanged;
                }
                Ok(_) => error!("login failed: empty session token"),
                Err(error) => error!(%error, "login failed"),
            }
        }

        match self.auth.register().await {
            Ok(registration) if !registration.token.is_empty() => {
                self.tokens.set_token(Some(registration.token));
                self.tokens.set_access_token(Some(registration.access_token));
                info!("registered anonymous session");
                BootstrapOutcome::Registered
            }
            Ok(_) => {
                warn!("auto-registration failed: empty session token");
                BootstrapOutcome::Unauthenticated
            }
            Err(error) => {
                warn!(%error, "auto-registration failed");
                BootstrapOutcome::Unauthenticated
            }
        }
    }
}

/// Runs the bootstrap at most once per session.
///
/// Concurrent callers of [`SessionBootstrap::ensure`] all wait on the same run
/// and observe the same outcome.
pub struct SessionBootstrap<A> {
    use_case: BootstrapUseCase<A>,
    outcome: OnceCell<BootstrapOutcome>,
}

impl<A> SessionBootstrap<A>
where
    A: AuthApi,
{
    pub fn new(use_case: BootstrapUseCase<A>) -> Self {
        Self {
            use_case,
            outcome: OnceCell::new(),
        }
    }

    pub async fn ensure(&self) -> BootstrapOutcome {
        *self
            .outcome
            .get_or_init(|| self.use_case.execute())
            .await
    }

    /// Outcome of a finished run, if any.
    pub fn outcome(&self) -> Option<BootstrapOutcome> {
        self.outcome.get().copied()
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.use_case.tokens
    }
}
