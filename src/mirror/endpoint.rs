//! URL layout of the remote hub.

use crate::types::RemoteRepository;

/// Default tree API base.
pub const DEFAULT_API_BASE: &str = "https://huggingface.co/api/models";

/// Default base for file resolution URLs.
pub const DEFAULT_RESOLVE_BASE: &str = "https://huggingface.co";

/// Where tree listings and file payloads are fetched from.
///
/// ```rust
/// # use huginn::{HubEndpoint, RemoteRepository};
/// let endpoint = HubEndpoint::default();
/// let repo = RemoteRepository::new("owner/model");
/// assert_eq!(
///     endpoint.tree_url(&repo, "Seg.mlmodelc"),
///     "https://huggingface.co/api/models/owner/model/tree/main/Seg.mlmodelc"
/// );
/// assert_eq!(
///     endpoint.resolve_url(&repo, "config.json"),
///     "https://huggingface.co/owner/model/resolve/main/config.json"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubEndpoint {
    pub api_base: String,
    pub resolve_base: String,
}

impl Default for HubEndpoint {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            resolve_base: DEFAULT_RESOLVE_BASE.to_string(),
        }
    }
}

impl HubEndpoint {
    pub fn new(api_base: impl Into<String>, resolve_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            resolve_base: resolve_base.into(),
        }
    }

    /// Endpoint rooted at a single host, laid out like the public hub (for
    /// mirrors and for testing with wiremock).
    pub fn with_base_url(base_url: impl AsRef<str>) -> Self {
        let base = base_url.as_ref().trim_end_matches('/');
        Self::new(format!("{base}/api/models"), base)
    }

    /// `<api_base>/<namespace>/tree/<revision>[/<path>]`
    pub fn tree_url(&self, repo: &RemoteRepository, path: &str) -> String {
        let mut url = format!(
            "{}/{}/tree/{}",
            self.api_base.trim_end_matches('/'),
            repo.namespace,
            repo.revision
        );
        let path = path.trim_matches('/');
        if !path.is_empty() {
            url.push('/');
            url.push_str(path);
        }
        url
    }

    /// `<resolve_base>/<namespace>/resolve/<revision>/<path>`
    pub fn resolve_url(&self, repo: &RemoteRepository, path: &str) -> String {
        format!(
            "{}/{}/resolve/{}/{}",
            self.resolve_base.trim_end_matches('/'),
            repo.namespace,
            repo.revision,
            path.trim_start_matches('/')
        )
    }
}
