use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::User;
use crate::domain::errors::ApiError;

// The serialization within this layer is a dependency leak, but its a pragmatic approach.
// Payload sent to exchange an access token for a session token.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub access_token: String,
}

// The login endpoint answers with a bare JSON string; a `{ "token": ... }`
// envelope is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Bare(String),
    Wrapped { token: String },
}

impl LoginResponse {
    pub fn into_token(self) -> String {
        match self {
            LoginResponse::Bare(token) | LoginResponse::Wrapped { token } => token,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

// Credentials issued to an anonymous visitor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterResponse {
    pub token: String,
    pub access_token: String,
}

// The bootstrap depends on this trait, not the concrete repository.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn me(&self) -> Result<MeResponse, ApiError>;
    async fn login(&self, req: LoginRequest) -> Result<String, ApiError>;
    async fn register(&self) -> Result<RegisterResponse, ApiError>;
}
