use async_trait::async_trait;

use crate::domain::{ApiError, AuthApi, LoginRequest, LoginResponse, MeResponse, RegisterResponse};
use crate::interface_adapters::http::{ApiClient, ApiRequest};

#[derive(Clone)]
pub struct AuthRepository {
    api: ApiClient,
}

impl AuthRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchange an access token for a session token.
    /// POST /api/login
    pub async fn login(&self, body: &LoginRequest) -> Result<String, ApiError> {
        let request = ApiRequest::post("/api/login").json(body)?;
        let response: LoginResponse = self.api.call(request).await?;
        Ok(response.into_token())
    }

    /// Current authenticated user.
    /// GET /api/me
    pub async fn me(&self) -> Result<MeResponse, ApiError> {
        self.api.call(ApiRequest::get("/api/me")).await
    }

    /// POST /api/register
    pub async fn register(&self) -> Result<RegisterResponse, ApiError> {
        self.api.call(ApiRequest::post("/api/register")).await
    }
}

#[async_trait]
impl AuthApi for AuthRepository {
    async fn me(&self) -> Result<MeResponse, ApiError> {
        AuthRepository::me(self).await
    }

    async fn login(&self, req: LoginRequest) -> Result<String, ApiError> {
        AuthRepository::login(self, &req).await
    }

    async fn register(&self) -> Result<RegisterResponse, ApiError> {
        AuthRepository::register(self).await
    }
}
