use async_trait::async_trait;

use crate::domain::{ApiError, Setting, SettingsApi};
use crate::interface_adapters::http::{ApiClient, ApiRequest};

#[derive(Clone)]
pub struct SettingsRepository {
    api: ApiClient,
}

impl SettingsRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// GET /api/settings
    pub async fn get_settings(&self) -> Result<Setting, ApiError> {
        self.api.call(ApiRequest::get("/api/settings")).await
    }
}

#[async_trait]
impl SettingsApi for SettingsRepository {
    async fn get_settings(&self) -> Result<Setting, ApiError> {
        SettingsRepository::get_settings(self).await
    }
}
