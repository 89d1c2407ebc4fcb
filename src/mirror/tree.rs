//! Remote tree listings, one directory level per call.

use std::sync::Arc;

use tracing::debug;

use super::endpoint::HubEndpoint;
use crate::telemetry;
use crate::transport::{FetchRequest, Transport};
use crate::types::{RemoteEntry, RemoteRepository};
use crate::{HuginnError, Result};

/// Lists directory levels of a remote repository.
#[derive(Clone)]
pub struct TreeWalker {
    transport: Arc<dyn Transport>,
    endpoint: HubEndpoint,
}

impl TreeWalker {
    pub fn new(transport: Arc<dyn Transport>, endpoint: HubEndpoint) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    /// Immediate children of `relative_path` (`""` for the repository root).
    ///
    /// Any failure, including a non-200 status or an undecodable body, is a
    /// [`HuginnError::Listing`]; a partial tree is never returned.
    pub async fn list_entries(
        &self,
        repository: &RemoteRepository,
        relative_path: &str,
    ) -> Result<Vec<RemoteEntry>> {
        let url = self.endpoint.tree_url(repository, relative_path);
        debug!(repository = %repository, path = relative_path, %url, "listing");

        match self.fetch_listing(&url).await {
            Ok(entries) => {
                metrics::counter!(telemetry::LISTINGS_TOTAL, "status" => "ok").increment(1);
                debug!(path = relative_path, count = entries.len(), "listed");
                Ok(entries)
            }
            Err(reason) => {
                metrics::counter!(telemetry::LISTINGS_TOTAL, "status" => "error").increment(1);
                Err(HuginnError::Listing {
                    repository: repository.namespace.clone(),
                    path: relative_path.to_string(),
                    reason,
                })
            }
        }
    }

    async fn fetch_listing(&self, url: &str) -> std::result::Result<Vec<RemoteEntry>, String> {
        let response = self
            .transport
            .fetch(&FetchRequest::listing(url))
            .await
            .map_err(|e| e.to_string())?;

        if response.status != 200 {
            return Err(format!("HTTP {}", response.status));
        }

        let body = response.collect().await.map_err(|e| e.to_string())?;
        serde_json::from_slice(&body).map_err(|e| format!("invalid tree listing: {e}"))
    }
}
