//! HTTP transport collaborator
//!
//! The dispatcher talks to the gateway through the [`Transport`] trait:
//! one call taking a method, a path relative to the base URL, and an
//! optional JSON body, answering a raw status+body or a transport error.
//! [`HttpTransport`] is the shipped implementation; tests substitute their
//! own.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;

/// Request methods the gateway API uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    /// Method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        }
    }
}

/// Raw gateway response before mapping
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Failure to produce a usable response
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("malformed gateway response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_decode() {
            TransportError::Malformed(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Transport collaborator trait
///
/// Base URL, authentication, serialization, timeouts, and pooling all
/// live behind this seam.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one request and hand back the raw status and body
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse, TransportError>;
}

/// Production environment
pub const PRODUCTION_URL: &str = "https://api.cieloecommerce.cielo.com.br/1/";
/// Sandbox environment
pub const SANDBOX_URL: &str = "https://apisandbox.cieloecommerce.cielo.com.br/1/";

/// reqwest-backed transport with the gateway's header authentication
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    merchant_id: String,
    merchant_key: SecretString,
}

impl HttpTransport {
    /// Create a transport against the production environment
    pub fn new(merchant_id: impl Into<String>, merchant_key: impl Into<String>) -> Self {
        let merchant_key: String = merchant_key.into();
        Self {
            client: reqwest::Client::new(),
            base_url: PRODUCTION_URL.to_string(),
            merchant_id: merchant_id.into(),
            merchant_key: SecretString::new(merchant_key.into()),
        }
    }

    /// Create a transport against the sandbox environment
    pub fn sandbox(merchant_id: impl Into<String>, merchant_key: impl Into<String>) -> Self {
        Self::new(merchant_id, merchant_key).with_base_url(SANDBOX_URL)
    }

    /// Override the base URL (must end with `/`)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a caller-configured client (timeouts, pooling, proxies)
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = method.as_str(), %url, "sending gateway request");

        let mut request = self
            .client
            .request(method.into(), &url)
            .header("MerchantId", self.merchant_id.as_str())
            .header("MerchantKey", self.merchant_key.expose_secret())
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}
