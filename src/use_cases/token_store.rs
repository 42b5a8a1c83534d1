use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

use crate::domain::{ACCESS_TOKEN_KEY, CookieJar};

/// Session-scoped holder of the bearer token.
///
/// The cookie jar is the persisted copy; the watch cell is the in-memory copy
/// every component reads and can subscribe to. Both are written together.
/// Tokens are opaque here: validity is only ever decided upstream.
pub struct TokenStore {
    jar: Arc<dyn CookieJar>,
    token_key: String,
    token: watch::Sender<Option<String>>,
}

impl TokenStore {
    pub fn new(jar: Arc<dyn CookieJar>, token_key: impl Into<String>) -> Self {
        let token_key = token_key.into();
        let initial = match jar.get(&token_key) {
            Ok(value) => non_empty(value),
            Err(error) => {
                warn!(%error, cookie = %token_key, "failed to read session cookie");
                None
            }
        };
        let (token, _) = watch::channel(initial);

        Self {
            jar,
            token_key,
            token,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    /// Replace the session token; `None` clears the cookie.
    pub fn set_token(&self, token: Option<String>) {
        let token = non_empty(token);
        write_cookie(self.jar.as_ref(), &self.token_key, token.as_deref());
        self.token.send_replace(token);
    }

    pub fn access_token(&self) -> Option<String> {
        match self.jar.get(ACCESS_TOKEN_KEY) {
            Ok(value) => non_empty(value),
            Err(error) => {
                warn!(%error, cookie = ACCESS_TOKEN_KEY, "failed to read access token cookie");
                None
            }
        }
    }

    pub fn set_access_token(&self, token: Option<String>) {
        let token = non_empty(token);
        write_cookie(self.jar.as_ref(), ACCESS_TOKEN_KEY, token.as_deref());
    }

    /// Receiver that observes every session token change.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }

    pub fn logout(&self) {
        self.set_token(None);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|token| !token.is_empty())
}

// Persistence failures are logged; the in-memory value still moves on.
fn write_cookie(jar: &dyn CookieJar, name: &str, value: Option<&str>) {
    let result = match value {
        Some(value) => jar.set(name, value),
        None => jar.remove(name),
    };
    if let Err(error) = result {
        warn!(%error, cookie = %name, "failed to persist cookie");
    }
}
