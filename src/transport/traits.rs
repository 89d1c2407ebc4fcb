//! The seam between the sync engine and the network.
//!
//! Everything that talks to the hub goes through [`Transport::fetch`]. The
//! production implementation is [`HttpTransport`](super::HttpTransport);
//! tests inject scripted fakes to count requests or to drive the retry loop
//! on a paused clock.

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt, stream};

use crate::{HuginnError, Result};

/// Response body as a stream of byte chunks.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>>> + Send>>;

/// `Accept` value for file payloads.
pub const ACCEPT_OCTET_STREAM: &str = "application/octet-stream";

/// `Accept` value for tree listings.
pub const ACCEPT_JSON: &str = "application/json";

/// A single GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub accept: &'static str,
    /// First byte to request (`Range: bytes=<n>-`). `None` or 0 fetches the
    /// whole resource.
    pub range_start: Option<u64>,
}

impl FetchRequest {
    /// Request for a file payload.
    pub fn download(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            accept: ACCEPT_OCTET_STREAM,
            range_start: None,
        }
    }

    /// Request for a JSON tree listing.
    pub fn listing(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            accept: ACCEPT_JSON,
            range_start: None,
        }
    }

    /// Resume from `offset`; an offset of 0 clears the range.
    pub fn resume_from(mut self, offset: u64) -> Self {
        self.range_start = (offset > 0).then_some(offset);
        self
    }
}

/// Largest buffer [`FetchResponse::collect`] reserves up front.
pub const MAX_PREALLOCATION: u64 = 1 << 20;

/// Response headers plus a streaming body.
pub struct FetchResponse {
    pub status: u16,
    /// Raw `Content-Type` header value.
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub body: BodyStream,
}

impl FetchResponse {
    /// Build a response with an in-memory body (used by fakes and tests).
    pub fn from_bytes(status: u16, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        Self {
            status,
            content_type: content_type.map(str::to_string),
            content_length: Some(body.len() as u64),
            body: Box::pin(stream::iter(vec![Ok::<_, HuginnError>(body)])),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Drain the body into memory.
    ///
    /// `Content-Length` is only a capacity hint, capped at
    /// [`MAX_PREALLOCATION`] bytes.
    pub async fn collect(mut self) -> Result<Vec<u8>> {
        let hint = self.content_length.unwrap_or(0).min(MAX_PREALLOCATION);
        let mut out = Vec::with_capacity(hint as usize);
        while let Some(chunk) = self.body.next().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }
}

impl std::fmt::Debug for FetchResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Performs requests against the remote hub.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logging/debugging.
    fn name(&self) -> &str;

    /// Issue a GET request and return once response headers are available.
    ///
    /// Non-2xx statuses are returned as responses, not errors; only
    /// transport-level failures (connect, TLS, timeout) are `Err`.
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}
