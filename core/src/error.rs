//! Error types for request composition.
//!
//! # Design
//! Every failure the core can produce surfaces synchronously from
//! `RequestClient::make_request`. Nothing here is retried; a half-built
//! `Request` is simply dropped. Filesystem failures carry the offending path
//! because they are raised long after the `FileSpec` was constructed.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned while composing or dispatching a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A path template placeholder had no value in the call descriptor.
    #[error("missing value for path placeholder `{name}`")]
    MissingPathValue { name: String },

    /// A caller-facing file type tag is not one of the supported tags.
    #[error("unsupported file type `{tag}`; expected one of: {}", .valid.join(", "))]
    UnsupportedFileType { tag: String, valid: Vec<String> },

    /// A path-backed file did not exist when the request was built.
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// A path-backed file existed but could not be read.
    #[error("file unreadable: {}", .path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required configuration value was absent.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    /// The injected transport failed to execute the request.
    #[error("transport failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
    /// Wrap an arbitrary transport failure.
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ApiError::Transport(err.into())
    }

    /// Classify an I/O error raised while touching `path`.
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ApiError::FileNotFound { path }
        } else {
            ApiError::FileUnreadable { path, source }
        }
    }
}
