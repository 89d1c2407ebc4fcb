//! Builder for configuring mirror instances

use std::path::PathBuf;
use std::sync::Arc;

use super::HubMirror;
use super::endpoint::HubEndpoint;
use super::planner::SyncPlanner;
use super::tree::TreeWalker;
use crate::Result;
use crate::cancel::CancellationFlag;
use crate::config::{HuginnConfig, default_base_dir};
use crate::transfer::{RetryConfig, TransferClient};
use crate::transport::{HttpTransport, Transport, TransportConfig};

/// Main entry point for creating mirror instances.
pub struct Huginn;

impl Huginn {
    /// Create a new builder for configuring the mirror.
    pub fn builder() -> HuginnBuilder {
        HuginnBuilder::new()
    }
}

/// Builder for configuring mirror instances.
pub struct HuginnBuilder {
    base_dir: Option<PathBuf>,
    endpoint: HubEndpoint,
    retry: RetryConfig,
    transport: Option<Arc<dyn Transport>>,
    transport_config: Option<TransportConfig>,
    bundle_suffixes: Option<Vec<String>>,
    cancel: Option<CancellationFlag>,
}

impl HuginnBuilder {
    pub fn new() -> Self {
        Self {
            base_dir: None,
            endpoint: HubEndpoint::default(),
            retry: RetryConfig::default(),
            transport: None,
            transport_config: None,
            bundle_suffixes: None,
            cancel: None,
        }
    }

    /// Apply every setting from a loaded configuration file.
    pub fn config(mut self, config: &HuginnConfig) -> Self {
        self.base_dir = Some(config.base_dir());
        self.endpoint = config.endpoint();
        self.retry = config.retry_config();
        self.transport_config = Some(config.transport_config());
        self.bundle_suffixes = Some(config.planner.bundle_suffixes.clone());
        self
    }

    /// Directory repositories are mirrored into.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn endpoint(mut self, endpoint: HubEndpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Point listings and downloads at a single host (mirror or test server).
    pub fn base_url(mut self, url: impl AsRef<str>) -> Self {
        self.endpoint = HubEndpoint::with_base_url(url);
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Use a custom transport instead of HTTP.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build a dedicated HTTP transport with these settings.
    pub fn transport_config(mut self, config: TransportConfig) -> Self {
        self.transport_config = Some(config);
        self
    }

    pub fn bundle_suffixes<S: Into<String>>(mut self, suffixes: impl IntoIterator<Item = S>) -> Self {
        self.bundle_suffixes = Some(suffixes.into_iter().map(Into::into).collect());
        self
    }

    /// Share a cancellation flag with the caller (e.g. a signal handler).
    pub fn cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Build the mirror.
    ///
    /// Without an explicit transport or transport settings, the process-wide
    /// [`HttpTransport::shared`] client is used.
    pub fn build(self) -> Result<HubMirror> {
        let transport: Arc<dyn Transport> = match (self.transport, self.transport_config) {
            (Some(transport), _) => transport,
            (None, Some(config)) => Arc::new(HttpTransport::new(config)?),
            (None, None) => {
                let shared: Arc<dyn Transport> = HttpTransport::shared()?;
                shared
            }
        };

        let planner = match self.bundle_suffixes {
            Some(suffixes) => SyncPlanner::new(suffixes),
            None => SyncPlanner::default(),
        };

        Ok(HubMirror {
            transfer: TransferClient::new(Arc::clone(&transport), self.retry),
            walker: TreeWalker::new(transport, self.endpoint.clone()),
            planner,
            endpoint: self.endpoint,
            base_dir: self.base_dir.unwrap_or_else(default_base_dir),
            cancel: self.cancel.unwrap_or_default(),
        })
    }
}

impl Default for HuginnBuilder {
    fn default() -> Self {
        Self::new()
    }
}
