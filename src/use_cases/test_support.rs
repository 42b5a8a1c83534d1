use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::{
    ApiError, AuthApi, LoginRequest, MeResponse, RegisterResponse, Setting, SettingsApi, User,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AuthCall {
    Me,
    Login(String),
    Register,
}

// Which auth endpoints answer with an error.
#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub me: bool,
    pub login: bool,
    pub register: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingAuthApi {
    calls: Arc<Mutex<Vec<AuthCall>>>,
    failures: FailureFlags,
    login_token: String,
    registration: RegisterResponse,
    // Artificial latency so concurrent callers overlap.
    delay: Duration,
}

impl RecordingAuthApi {
    pub(crate) fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: FailureFlags::default(),
            login_token: "T-login".to_string(),
            registration: RegisterResponse {
                token: "T-register".to_string(),
                access_token: "A-register".to_string(),
            },
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn with_login_token(mut self, token: impl Into<String>) -> Self {
        self.login_token = token.into();
        self
    }

    pub(crate) fn with_register_tokens(
        mut self,
        token: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        self.registration = RegisterResponse {
            token: token.into(),
            access_token: access_token.into(),
        };
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> Vec<AuthCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    async fn record(&self, call: AuthCall) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl AuthApi for RecordingAuthApi {
    async fn me(&self) -> Result<MeResponse, ApiError> {
        self.record(AuthCall::Me).await;
        if self.failures.me {
            return Err(ApiError::from_response(401, None));
        }
        Ok(MeResponse {
            user: User::default(),
        })
    }

    async fn login(&self, req: LoginRequest) -> Result<String, ApiError> {
        self.record(AuthCall::Login(req.access_token)).await;
        if self.failures.login {
            return Err(ApiError::from_response(401, None));
        }
        Ok(self.login_token.clone())
    }

    async fn register(&self) -> Result<RegisterResponse, ApiError> {
        self.record(AuthCall::Register).await;
        if self.failures.register {
            return Err(ApiError::from_response(500, None));
        }
        Ok(self.registration.clone())
    }
}

#[derive(Clone)]
pub(crate) struct RecordingSettingsApi {
    calls: Arc<Mutex<usize>>,
    // Number of leading calls that fail before settings load.
    fail_first: usize,
}

impl RecordingSettingsApi {
    pub(crate) fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(0)),
            fail_first: 0,
        }
    }

    pub(crate) fn failing_first(mut self, count: usize) -> Self {
        self.fail_first = count;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        *self.calls.lock().expect("calls mutex poisoned")
    }
}

#[async_trait]
impl SettingsApi for RecordingSettingsApi {
    async fn get_settings(&self) -> Result<Setting, ApiError> {
        let call = {
            let mut guard = self.calls.lock().expect("calls mutex poisoned");
            *guard += 1;
            *guard
        };
        if call <= self.fail_first {
            return Err(ApiError::from_response(503, None));
        }
        let values = json!({ "theme": "dark" });
        Ok(serde_json::from_value(values).expect("settings fixture"))
    }
}
