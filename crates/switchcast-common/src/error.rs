//! Service-level error type.
//!
//! Every failure surfaced by the switchcast service funnels into [`Error`],
//! which carries enough context for HTTP handlers to derive a status code via
//! [`Error::http_status`].

use std::fmt;

/// Common error type for switchcast.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "source").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Fetching an upstream playlist failed.
    #[error("Upstream error [{url}]: {message}")]
    Upstream {
        /// The playlist URL that was fetched.
        url: String,
        /// Human-readable error description.
        message: String,
    },

    /// An upstream playlist could not be parsed or merged.
    #[error("Playlist error: {0}")]
    Playlist(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::Validation(_) => 400,
            Error::Upstream { .. } => 502,
            Error::Playlist(_) => 500,
        }
    }

    /// Short machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::Validation(_) => "validation_error",
            Error::Upstream { .. } => "upstream_error",
            Error::Playlist(_) => "playlist_error",
        }
    }

    /// Create a new NotFound error.
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a new Upstream error.
    pub fn upstream(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Upstream {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a new Playlist error.
    pub fn playlist(err: impl fmt::Display) -> Self {
        Self::Playlist(err.to_string())
    }

    /// Create a new Validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
