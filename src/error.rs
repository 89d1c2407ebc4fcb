//! Huginn error types

use std::path::PathBuf;

/// Huginn error types
#[derive(Debug, thiserror::Error)]
pub enum HuginnError {
    // Transfer errors (retryable)
    #[error("rate limited (HTTP {status})")]
    RateLimited { status: u16 },

    #[error("unexpected HTML content instead of file payload: {snippet}")]
    UnexpectedContent { snippet: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(String),

    // Transfer errors (permanent)
    #[error(
        "access denied (HTTP {status}); set HF_TOKEN, HUGGINGFACEHUB_API_TOKEN or HUGGING_FACE_HUB_TOKEN for gated repositories"
    )]
    Unauthorized { status: u16 },

    // Sync errors
    #[error("failed to list '{path}' in {repository}: {reason}")]
    Listing {
        repository: String,
        path: String,
        reason: String,
    },

    #[error("failed to install {}: {source}", .path.display())]
    Install {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{repository}: failed to fetch '{path}': {source}")]
    File {
        repository: String,
        path: String,
        #[source]
        source: Box<HuginnError>,
    },

    // Structural checks on a mirrored repository
    #[error("required file missing: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("corrupt bundle {}: {reason}", .path.display())]
    CorruptBundle { path: PathBuf, reason: String },

    // Local errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("operation cancelled")]
    Cancelled,
}

impl HuginnError {
    /// Whether the transfer retry loop should try again after this error.
    ///
    /// Rate limiting, HTML served in place of a payload, malformed responses
    /// and transport failures are transient. Everything else, including
    /// cancellation, is returned to the caller immediately.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            HuginnError::RateLimited { .. }
                | HuginnError::UnexpectedContent { .. }
                | HuginnError::InvalidResponse(_)
                | HuginnError::Http(_)
        )
    }

    /// Walk `File` context wrappers down to the underlying error.
    pub fn root_cause(&self) -> &HuginnError {
        match self {
            HuginnError::File { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<reqwest::Error> for HuginnError {
    fn from(err: reqwest::Error) -> Self {
        HuginnError::Http(err.to_string())
    }
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, HuginnError>;
