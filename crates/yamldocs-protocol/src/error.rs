//! Per-request error taxonomy and its HTTP status mapping.

use thiserror::Error;

/// An error raised while handling a single request.
///
/// Every variant is caught at the handler boundary and translated into a
/// status code; none of them may take the listener down.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing required query parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    #[error("method {method} not allowed (allowed: {allow})")]
    MethodNotAllowed { method: String, allow: &'static str },

    #[error("path `{0}` escapes the workspace root")]
    Escape(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("workspace root is unavailable")]
    RootUnavailable,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn io(path: impl std::fmt::Display, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            source,
        }
    }

    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::MissingParameter(_) | Self::InvalidQuery(_) | Self::Escape(_) => 400,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::RootUnavailable | Self::Io { .. } => 500,
        }
    }

    /// True for failures caused by the server side rather than the caller.
    pub fn is_server_error(&self) -> bool {
        self.status() >= 500
    }
}
