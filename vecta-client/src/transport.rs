/// Transport abstraction and the reqwest-backed HTTP implementation
///
/// A transport executes one `RestRequest` and returns the decoded JSON body.
/// Non-2xx responses become `Error::Server` carrying the status and body,
/// connection failures become `Error::Network`. Retries, if any, happen here.

use crate::config::ClientConfig;
use crate::retry::{retry_with_policy, RetryPolicy};
use async_trait::async_trait;
use serde_json::Value as Json;
use tracing::debug;
use vecta_core::{Error, Method, RestRequest, Result, UsageError};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a request. Empty success bodies decode to `Json::Null`.
    async fn send(&self, request: RestRequest) -> Result<Json>;

    async fn get(&self, path: &str) -> Result<Json> {
        self.send(RestRequest::new(Method::Get, path)).await
    }

    async fn post(&self, path: &str, body: Json) -> Result<Json> {
        self.send(RestRequest::new(Method::Post, path).with_body(body)).await
    }

    async fn put(&self, path: &str, body: Json) -> Result<Json> {
        self.send(RestRequest::new(Method::Put, path).with_body(body)).await
    }

    async fn patch(&self, path: &str, body: Json) -> Result<Json> {
        self.send(RestRequest::new(Method::Patch, path).with_body(body)).await
    }

    async fn delete(&self, path: &str, body: Option<Json>) -> Result<Json> {
        let mut request = RestRequest::new(Method::Delete, path);
        request.body = body;
        self.send(request).await
    }
}

/// HTTP transport over reqwest.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::Usage(UsageError::new(e)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            retry: config.retry.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    async fn send_once(&self, request: &RestRequest) -> Result<Json> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(Self::method(request.method), &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        debug!(status = status.as_u16(), bytes = text.len(), "received response");

        let body = decode_body(&text);
        if status.is_success() {
            body.map_err(|e| Error::Decode(format!("response is not JSON: {}", e)))
        } else {
            Err(Error::Server {
                status: status.as_u16(),
                body: body.unwrap_or(Json::String(text)),
            })
        }
    }
}

/// Parse a response body. An empty body is `Null`.
fn decode_body(text: &str) -> serde_json::Result<Json> {
    if text.trim().is_empty() {
        return Ok(Json::Null);
    }
    serde_json::from_str(text)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RestRequest) -> Result<Json> {
        debug!(method = %request.method, path = %request.path, "sending request");
        retry_with_policy(&self.retry, || self.send_once(&request)).await
    }
}
