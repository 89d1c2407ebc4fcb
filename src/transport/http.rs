//! `reqwest`-backed transport.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, RANGE};
use tracing::debug;

use super::credentials;
use super::traits::{FetchRequest, FetchResponse, Transport};
use crate::{HuginnError, Result};

/// Construction parameters for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// `User-Agent` header. Default: `huginn/<version>`.
    pub user_agent: String,
    /// Bearer token. Default: discovered from the environment.
    pub token: Option<String>,
    /// TCP/TLS connect timeout. Default: 30s.
    pub connect_timeout: Duration,
    /// Whole-request timeout, body included. Default: 30 minutes.
    pub request_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: crate::version::user_agent(),
            token: credentials::discover_token(),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(1800),
        }
    }
}

impl TransportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit token instead of the discovered one.
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// HTTP transport used in production.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    token: Option<String>,
}

static SHARED: OnceLock<Arc<HttpTransport>> = OnceLock::new();

impl HttpTransport {
    /// Build a transport from explicit settings.
    pub fn new(config: TransportConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| HuginnError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            token: config.token,
        })
    }

    /// Process-wide transport with default settings, built on first use.
    pub fn shared() -> Result<Arc<HttpTransport>> {
        if let Some(transport) = SHARED.get() {
            return Ok(Arc::clone(transport));
        }
        let transport = Arc::new(Self::new(TransportConfig::default())?);
        Ok(Arc::clone(SHARED.get_or_init(|| transport)))
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let mut req = self.http.get(&request.url).header(ACCEPT, request.accept);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        if let Some(start) = request.range_start {
            req = req.header(RANGE, format!("bytes={start}-"));
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = response.content_length();
        debug!(url = %request.url, status, ?content_length, "response headers received");

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(HuginnError::from));

        Ok(FetchResponse {
            status,
            content_type,
            content_length,
            body: Box::pin(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_token_overrides_discovery() {
        let config = TransportConfig::new().token(Some("hf_explicit".into()));
        let transport = HttpTransport::new(config).unwrap();
        assert!(transport.has_token());

        let transport = HttpTransport::new(TransportConfig::new().token(None)).unwrap();
        assert!(!transport.has_token());
    }

    #[test]
    fn shared_transport_is_reused() {
        let a = HttpTransport::shared().unwrap();
        let b = HttpTransport::shared().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
