use serde::{Deserialize, Serialize};

/// A remote model repository and where it is mirrored locally.
///
/// ```rust
/// # use huginn::RemoteRepository;
/// let repo = RemoteRepository::new("FluidInference/speaker-diarization-coreml")
///     .variant("v2");
/// assert_eq!(repo.folder_name, "speaker-diarization-coreml");
/// assert_eq!(repo.revision, "main");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    /// Remote namespace, e.g. `owner/name`.
    pub namespace: String,
    /// Directory name under the cache base directory.
    pub folder_name: String,
    /// Optional variant tag narrowing which files are required.
    #[serde(default)]
    pub variant: Option<String>,
    /// Branch, tag or commit to mirror.
    #[serde(default = "default_revision")]
    pub revision: String,
}

fn default_revision() -> String {
    "main".to_string()
}

impl RemoteRepository {
    /// Create a repository whose local folder is the last namespace segment.
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let folder_name = namespace
            .rsplit('/')
            .next()
            .unwrap_or(namespace.as_str())
            .to_string();
        Self {
            namespace,
            folder_name,
            variant: None,
            revision: default_revision(),
        }
    }

    /// Override the local folder name.
    pub fn folder_name(mut self, folder_name: impl Into<String>) -> Self {
        self.folder_name = folder_name.into();
        self
    }

    /// Set the variant tag.
    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Pin a revision other than `main`.
    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }
}

impl std::fmt::Display for RemoteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.namespace, self.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_defaults_to_last_segment() {
        let repo = RemoteRepository::new("owner/model-coreml");
        assert_eq!(repo.folder_name, "model-coreml");
        assert!(repo.variant.is_none());
    }

    #[test]
    fn bare_namespace_is_its_own_folder() {
        assert_eq!(RemoteRepository::new("model").folder_name, "model");
    }

    #[test]
    fn display_includes_revision() {
        let repo = RemoteRepository::new("owner/m").revision("v1.2");
        assert_eq!(repo.to_string(), "owner/m@v1.2");
    }
}
