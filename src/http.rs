//! HTTP transport adapter
//!
//! [`HttpClient`] performs authenticated GET requests and exposes the raw
//! status/headers/body as an [`ApiResponse`]. It is pure transport: status
//! codes are not interpreted here. Classification into success, transient
//! failure, or permanent failure happens in [`ApiResponse::into_result`],
//! which the retry layer applies to every attempt.

use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use url::Url;

/// Blocking-free GET transport with a bounded per-request timeout
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    token: Option<String>,
    user_agent: String,
}

/// Raw outcome of one HTTP attempt
#[derive(Debug)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers (pagination links, rate-limit signaling)
    pub headers: HeaderMap,
    /// Raw response body
    pub body: Vec<u8>,
}

impl HttpClient {
    /// Build a transport client from the configuration
    ///
    /// The bearer token is threaded in via [`Config`]; this adapter never
    /// reads the environment.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            token: config.token.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Issue one GET request
    ///
    /// Network-level failures (DNS, connection reset, timeout) surface as
    /// [`Error::Transport`]. Any response that arrives, whatever its status,
    /// is returned as an [`ApiResponse`].
    pub async fn get(&self, url: Url, query: &[(&str, String)]) -> Result<ApiResponse> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", &self.user_agent);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

impl ApiResponse {
    /// Classify this response
    ///
    /// - 2xx passes through unchanged
    /// - 5xx and 429 become [`Error::TransientApi`]
    /// - everything else becomes [`Error::PermanentApi`] with the body
    ///   captured for diagnostics
    pub fn into_result(self) -> Result<ApiResponse> {
        if self.status.is_success() {
            return Ok(self);
        }

        let status = self.status.as_u16();
        let body = String::from_utf8_lossy(&self.body).into_owned();

        if self.status.is_server_error() || self.status == StatusCode::TOO_MANY_REQUESTS {
            Err(Error::TransientApi { status, body })
        } else {
            Err(Error::PermanentApi { status, body })
        }
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
