use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, RequestBuilder, Response, Url};
use std::time::Duration;
use tracing::{debug, warn};

use super::models::{ApiError, ErrorResponse, TransactionPayload};
use crate::api::TransactionService;
use crate::models::{Transaction, TransactionId};

/// HTTP client for the REST transaction service
pub struct LedgerApiClient {
    http_client: HttpClient,
    api_token: Option<String>,
    base_url: Url,
}

impl LedgerApiClient {
    /// Create a new client rooted at `base_url`.
    ///
    /// `timeout` applies to every request; without it a request waits as long
    /// as the remote side keeps the connection open.
    pub fn new(
        base_url: Url,
        api_token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::RequestError(format!(
                "Base URL cannot hold a path: {}",
                base_url
            )));
        }

        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_token,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `transactions/` or `transactions/{id}/` below the base URL
    fn endpoint(&self, id: Option<&TransactionId>) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::RequestError(format!("Base URL cannot hold a path: {}", self.base_url))
            })?;
            segments.pop_if_empty().push("transactions");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
            segments.push("");
        }
        Ok(url)
    }

    /// Create default headers with optional authorization
    fn create_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.api_token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::RequestError(format!("Failed to create auth header: {}", e)))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    /// Send a request and turn any non-2xx status into an [`ApiError`]
    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let headers = self.create_headers()?;

        let response = request
            .headers(headers)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        Ok(response)
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(status: reqwest::StatusCode, response: Response) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body_text)
            .ok()
            .and_then(ErrorResponse::into_message)
            .unwrap_or(body_text);

        match status_code {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            500..=599 => {
                warn!("Server error {}: {}", status_code, message);
                ApiError::ServerError(status_code, message)
            }
            _ => ApiError::HttpError(status_code, message),
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl TransactionService for LedgerApiClient {
    async fn list(&self) -> Result<Vec<Transaction>, ApiError> {
        let url = self.endpoint(None)?;
        debug!("GET {}", url);

        let response = self.execute(self.http_client.get(url)).await?;
        Self::decode(response).await
    }

    async fn create(&self, payload: &TransactionPayload) -> Result<Transaction, ApiError> {
        let url = self.endpoint(None)?;
        debug!("POST {}", url);

        let response = self
            .execute(self.http_client.post(url).json(payload))
            .await?;
        Self::decode(response).await
    }

    async fn update(
        &self,
        id: &TransactionId,
        payload: &TransactionPayload,
    ) -> Result<Transaction, ApiError> {
        let url = self.endpoint(Some(id))?;
        debug!("PUT {}", url);

        let response = self.execute(self.http_client.put(url).json(payload)).await?;
        Self::decode(response).await
    }

    async fn delete(&self, id: &TransactionId) -> Result<(), ApiError> {
        let url = self.endpoint(Some(id))?;
        debug!("DELETE {}", url);

        self.execute(self.http_client.delete(url)).await?;
        Ok(())
    }
}
