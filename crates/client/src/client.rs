//! HTTP client for the Freispace backend.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use tracing::debug;

/// A response from the Freispace API: the HTTP status and the parsed JSON
/// body. Owned solely by the tool call that issued the request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub data: serde_json::Value,
}

/// Thin client over the Freispace analytics API.
///
/// Every request carries `Content-Type: application/json` and, when a key was
/// resolved, `x-api-key`. Calls are single-attempt: any non-2xx status fails
/// with the status code and raw response text, with no retry.
#[derive(Debug, Clone)]
pub struct FreispaceClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl FreispaceClient {
    /// Create a new client from configuration.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(ref api_key) = config.api_key {
            headers.insert(
                "x-api-key",
                HeaderValue::from_str(api_key)
                    .map_err(|_| ClientError::Config("Invalid API key format".to_string()))?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Execute a request against an endpoint path.
    ///
    /// The endpoint is joined onto the configured base URL; the caller owns
    /// leading-slash and query-string formatting. Caller-supplied headers
    /// override the defaults on conflict.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        headers: Option<HeaderMap>,
    ) -> ClientResult<HttpResponse> {
        let url = self.config.base_url.join(endpoint)?;
        debug!(method = %method, url = %url, "Freispace API request");

        let mut request = self.client.request(method, url);
        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let data = serde_json::from_str(&text)?;

        Ok(HttpResponse {
            status: status.as_u16(),
            data,
        })
    }

    /// Execute a GET request.
    pub async fn get(&self, endpoint: &str) -> ClientResult<HttpResponse> {
        self.request(Method::GET, endpoint, None, None).await
    }

    /// Execute a POST request with an optional JSON body.
    pub async fn post(
        &self,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> ClientResult<HttpResponse> {
        self.request(Method::POST, endpoint, body, None).await
    }

    /// Execute a PUT request with an optional JSON body.
    pub async fn put(
        &self,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> ClientResult<HttpResponse> {
        self.request(Method::PUT, endpoint, body, None).await
    }

    /// Execute a PATCH request with an optional JSON body.
    pub async fn patch(
        &self,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> ClientResult<HttpResponse> {
        self.request(Method::PATCH, endpoint, body, None).await
    }

    /// Execute a DELETE request with an optional JSON body.
    pub async fn delete(
        &self,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> ClientResult<HttpResponse> {
        self.request(Method::DELETE, endpoint, body, None).await
    }
}
