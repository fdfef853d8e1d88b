//! Storefront API client implementation

use crate::{
    config::{ClientConfig, TOKEN_HEADER},
    error::ClientError,
    request::{ApiRequest, RequestBody},
    response::ApiResponse,
};
use reqwest::{
    header::ACCEPT,
    multipart::{Form, Part},
    Client,
};

/// Storefront API client
///
/// Every call is issued once and awaited to completion. There is no retry,
/// no timeout and no backoff; transport failures are returned as-is.
#[derive(Clone, Debug)]
pub struct StorefrontClient {
    client: Client,
    config: ClientConfig,
}

impl StorefrontClient {
    /// Create a client for the given configuration
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Create a client from `STOREFRONT_URL` / `STOREFRONT_API_KEY`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if the configured URL is invalid
    pub fn from_env() -> Result<Self, ClientError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue a request and collect its status and body
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` when no response could be obtained.
    /// Non-2xx statuses are not errors: they are returned in the response.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let ApiRequest {
            method,
            path,
            query,
            body,
        } = request;

        tracing::debug!(method = %method, path = %path, "sending storefront request");

        let mut builder = self
            .client
            .request(method.clone(), self.config.endpoint(&path))
            .header(ACCEPT, "application/json");

        if let Some(key) = self.config.api_key() {
            builder = builder.header(TOKEN_HEADER, key);
        }

        if !query.is_empty() {
            builder = builder.query(&query);
        }

        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(upload) => {
                let part = Part::bytes(upload.bytes)
                    .file_name(upload.file_name)
                    .mime_str(&upload.mime)
                    .map_err(|source| ClientError::Transport {
                        path: path.clone(),
                        source,
                    })?;
                builder.multipart(Form::new().part(upload.field, part))
            }
        };

        let transport = |source| ClientError::Transport {
            path: path.clone(),
            source,
        };

        let response = builder.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;

        tracing::debug!(method = %method, path = %path, status, "storefront responded");

        Ok(ApiResponse::new(status, body))
    }

    /// `GET path`
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::send`]
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(ApiRequest::get(path)).await
    }

    /// `POST path` with an optional JSON body
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::send`]
    pub async fn post(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, ClientError> {
        self.send(with_body(ApiRequest::post(path), body)).await
    }

    /// `PUT path` with an optional JSON body
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::send`]
    pub async fn put(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse, ClientError> {
        self.send(with_body(ApiRequest::put(path), body)).await
    }

    /// `DELETE path`
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::send`]
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ClientError> {
        self.send(ApiRequest::delete(path)).await
    }
}

fn with_body(request: ApiRequest, body: Option<serde_json::Value>) -> ApiRequest {
    match body {
        Some(value) => request.json(value),
        None => request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_client_creation() {
        let config = ClientConfig::new("http://localhost:3000")
            .unwrap()
            .with_api_key("test-key");
        let client = StorefrontClient::new(config);

        assert_eq!(client.config().api_key(), Some("test-key"));
        assert_eq!(
            client.config().endpoint("/api/orders"),
            "http://localhost:3000/api/orders"
        );
    }

    #[test]
    fn test_with_body() {
        let request = with_body(ApiRequest::put("/api/checkouts/R1/next"), None);
        assert_eq!(request.body, RequestBody::Empty);
    }
}
