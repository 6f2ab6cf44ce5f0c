use std::time::Duration;

use reqwest::header::ACCEPT;

use crate::error::InvokeError;
use crate::types::{InvokeRequest, DEFAULT_REGION};
use crate::InvokeModel;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport for the Bedrock runtime `invoke` endpoint.
///
/// Authenticates with a bearer API key. Credential acquisition and request
/// signing schemes beyond that are out of scope; callers that need them can
/// provide their own [`InvokeModel`] implementation.
#[derive(Debug, Clone)]
pub struct HttpInvoker {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpInvoker {
    /// Creates an invoker for the default region.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::Config`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, InvokeError> {
        Self::for_region(DEFAULT_REGION, api_key)
    }

    /// Creates an invoker for the given region.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::Config`] if the HTTP client cannot be built.
    pub fn for_region(region: &str, api_key: impl Into<String>) -> Result<Self, InvokeError> {
        Self::with_endpoint(
            format!("https://bedrock-runtime.{region}.amazonaws.com"),
            api_key,
        )
    }

    /// Creates an invoker against an explicit base endpoint.
    ///
    /// Useful for staging endpoints and local test servers.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::Config`] if the HTTP client cannot be built.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, InvokeError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| InvokeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Replaces the request timeout (default 30 s).
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::Config`] if the HTTP client cannot be rebuilt.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self, InvokeError> {
        self.http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InvokeError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(self)
    }

    fn invoke_url(&self, model_id: &str) -> String {
        format!("{}/model/{model_id}/invoke", self.endpoint)
    }
}

#[async_trait::async_trait]
impl InvokeModel for HttpInvoker {
    async fn invoke(&self, request: &InvokeRequest) -> Result<Vec<u8>, InvokeError> {
        let url = self.invoke_url(&request.model_id);
        tracing::debug!(model_id = %request.model_id, "invoking model");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .json(&request.body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InvokeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
