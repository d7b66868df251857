use reqwest::Method;

use super::validated;
use crate::error::Result;
use crate::params::CreateApiKeyParams;
use crate::schema::SchemaKind;
use crate::types::ApiKey;
use crate::CallWhiz;

impl CallWhiz {
    /// Creates an API key. The secret in [`ApiKey::key`] is only returned here.
    pub async fn create_api_key(&self, params: CreateApiKeyParams) -> Result<ApiKey> {
        let body = validated(SchemaKind::ApiKeyCreate, &params)?;
        self.request(Method::POST, "/api-keys", Vec::new(), Some(body))
            .await
    }

    /// Lists API keys. Secrets are not included.
    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>> {
        self.request(Method::GET, "/api-keys", Vec::new(), None)
            .await
    }
}
