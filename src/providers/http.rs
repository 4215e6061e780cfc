//! Shared HTTP transport for the POS API
//!
//! Every provider goes through this client: bearer token auth, JSON
//! bodies, per-request timeout and uniform error mapping. The API signals
//! problems with a JSON body carrying a `detail` message; 204 means the
//! call succeeded with nothing to return.

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::AdminConfig;
use crate::models::{AppError, AppResult, ErrorCode};

/// Error payload the API returns on non-2xx responses
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    detail: Option<String>,
}

/// HTTP client bound to one POS installation
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: AdminConfig,
}

impl ApiClient {
    pub fn new(config: AdminConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// GET returning a deserialized body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        self.read_json(response).await
    }

    /// POST with a JSON body, returning the created resource
    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        self.read_json(response).await
    }

    /// POST where only the status matters (e.g. 202 Accepted)
    pub async fn post_status<B: Serialize>(&self, path: &str, body: &B) -> AppResult<StatusCode> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Ok(response.status())
    }

    /// PATCH with a JSON body, returning the updated resource
    pub async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> AppResult<T> {
        let response = self.send(Method::PATCH, path, Some(body)).await?;
        self.read_json(response).await
    }

    /// DELETE, 204 expected
    pub async fn delete(&self, path: &str) -> AppResult<()> {
        self.send(Method::DELETE, path, None::<&()>).await?;
        Ok(())
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> AppResult<Response> {
        let url = self.config.endpoint(path);
        debug!("🔍 {} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .timeout(self.config.request_timeout);

        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| format!("{} {} failed", method, path));

        warn!("⚠️ API error {} on {}: {}", status.as_u16(), path, detail);

        Err(AppError::new(
            ErrorCode::from_status(status.as_u16()),
            detail,
        ))
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> AppResult<T> {
        if response.status() == StatusCode::NO_CONTENT {
            return Err(AppError::new(
                ErrorCode::HttpInvalidResponse,
                "Expected a body but got 204 No Content",
            ));
        }
        response.json::<T>().await.map_err(|e| {
            AppError::new(
                ErrorCode::HttpInvalidResponse,
                format!("Failed to parse response body: {}", e),
            )
        })
    }
}
