//! Shared test fixtures: a scripted, request-counting [`Transport`].

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use huginn::transport::{FetchRequest, FetchResponse, Transport};
use huginn::{HuginnError, Result};

type Responder = Box<dyn Fn(&FetchRequest) -> Result<FetchResponse> + Send + Sync>;

/// Answers requests by URL suffix and records every request it sees.
///
/// Unrouted URLs get a 404.
pub struct ScriptedTransport {
    routes: Vec<(String, Responder)>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Route URLs ending in `suffix` to `responder`. First match wins.
    pub fn route(
        mut self,
        suffix: &str,
        responder: impl Fn(&FetchRequest) -> Result<FetchResponse> + Send + Sync + 'static,
    ) -> Self {
        self.routes.push((suffix.to_string(), Box::new(responder)));
        self
    }

    /// Serve a JSON tree listing.
    pub fn listing(self, suffix: &str, entries: serde_json::Value) -> Self {
        let body = entries.to_string();
        self.route(suffix, move |_| {
            Ok(FetchResponse::from_bytes(
                200,
                Some("application/json"),
                body.clone(),
            ))
        })
    }

    /// Serve a binary payload.
    pub fn file(self, suffix: &str, body: &[u8]) -> Self {
        let body = body.to_vec();
        self.route(suffix, move |_| {
            Ok(FetchResponse::from_bytes(
                200,
                Some("application/octet-stream"),
                body.clone(),
            ))
        })
    }

    /// Always answer with `status` and an empty body.
    pub fn status(self, suffix: &str, status: u16) -> Self {
        self.route(suffix, move |_| {
            Ok(FetchResponse::from_bytes(status, None, Vec::new()))
        })
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn total(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests whose URL ends in `suffix`.
    pub fn count(&self, suffix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.ends_with(suffix))
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.requests.lock().unwrap().push(request.clone());
        for (suffix, responder) in &self.routes {
            if request.url.ends_with(suffix.as_str()) {
                return responder(request);
            }
        }
        Ok(FetchResponse::from_bytes(404, Some("text/plain"), "not found"))
    }
}

/// A transport that fails every request at the connection level.
pub struct UnreachableTransport;

#[async_trait]
impl Transport for UnreachableTransport {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn fetch(&self, _request: &FetchRequest) -> Result<FetchResponse> {
        Err(HuginnError::Http("connection refused".to_string()))
    }
}

/// Tree listing entry for a file.
pub fn file_entry(path: &str, size: u64) -> serde_json::Value {
    serde_json::json!({ "type": "file", "path": path, "size": size })
}

/// Tree listing entry for a directory.
pub fn dir_entry(path: &str) -> serde_json::Value {
    serde_json::json!({ "type": "directory", "path": path, "size": 0 })
}

pub const SAMPLE_BASE: &str = "https://hub.test";

/// `owner/model` with `config.json`, `README.md` and a two-level
/// `Seg.mlmodelc` bundle holding `model.mil` and `weights/weight.bin`.
pub fn sample_hub() -> ScriptedTransport {
    ScriptedTransport::new()
        .listing(
            "/api/models/owner/model/tree/main",
            serde_json::json!([
                file_entry("config.json", 2),
                file_entry("README.md", 5),
                dir_entry("Seg.mlmodelc"),
            ]),
        )
        .listing(
            "/api/models/owner/model/tree/main/Seg.mlmodelc",
            serde_json::json!([
                file_entry("Seg.mlmodelc/model.mil", 4),
                dir_entry("Seg.mlmodelc/weights"),
            ]),
        )
        .listing(
            "/api/models/owner/model/tree/main/Seg.mlmodelc/weights",
            serde_json::json!([file_entry("Seg.mlmodelc/weights/weight.bin", 6)]),
        )
        .file("/owner/model/resolve/main/config.json", b"{}")
        .file("/owner/model/resolve/main/README.md", b"hello")
        .file("/owner/model/resolve/main/Seg.mlmodelc/model.mil", b"prog")
        .file(
            "/owner/model/resolve/main/Seg.mlmodelc/weights/weight.bin",
            b"\x00\x01\x02\x03\x04\x05",
        )
}

/// Mirror rooted at `base_dir`, talking to `transport`, without retries.
pub fn mirror(
    base_dir: &std::path::Path,
    transport: std::sync::Arc<dyn Transport>,
) -> huginn::HubMirror {
    huginn::Huginn::builder()
        .base_dir(base_dir)
        .base_url(SAMPLE_BASE)
        .transport(transport)
        .retry(huginn::RetryConfig::disabled())
        .build()
        .expect("mirror should build")
}
