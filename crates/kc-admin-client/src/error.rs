//! Error types for admin client operations.
//!
//! Every component reports failures through [`AdminError`]. Nothing is
//! retried here except readiness polling, so the first error a workflow hits
//! is the one the caller sees.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using the admin client error type.
pub type AdminResult<T> = std::result::Result<T, AdminError>;

/// Error type for admin client operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The backend never answered successfully within the allowed time.
    #[error("backend at {url} not ready after {waited:?}")]
    Timeout {
        /// URL that was polled.
        url: String,
        /// Time spent waiting.
        waited: Duration,
    },

    /// Credentials were rejected.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Resource already exists.
    #[error("{resource_type} already exists: {id}")]
    Conflict {
        /// Type of resource.
        resource_type: &'static str,
        /// Resource identifier.
        id: String,
    },

    /// Payload rejected before it was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{resource_type} not found: {id}")]
    NotFound {
        /// Type of resource.
        resource_type: &'static str,
        /// Resource identifier.
        id: String,
    },

    /// The server rejected the request.
    #[error("API error: {status} - {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Network-level failure (connection refused, timeout, DNS).
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a body that could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Bad configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The schema read back after an update does not match what was sent.
    #[error("verification failed: {0}")]
    Verification(String),

    /// The backend service could not be started or stopped.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Discriminant of [`AdminError`], for matching without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`AdminError::Timeout`].
    Timeout,
    /// See [`AdminError::Authentication`].
    Authentication,
    /// See [`AdminError::Conflict`].
    Conflict,
    /// See [`AdminError::Validation`].
    Validation,
    /// See [`AdminError::NotFound`].
    NotFound,
    /// See [`AdminError::Api`].
    Api,
    /// See [`AdminError::Transport`].
    Transport,
    /// See [`AdminError::InvalidResponse`].
    InvalidResponse,
    /// See [`AdminError::Config`].
    Config,
    /// See [`AdminError::Verification`].
    Verification,
    /// See [`AdminError::Backend`].
    Backend,
}

impl AdminError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Api { .. } => ErrorKind::Api,
            Self::Transport(_) => ErrorKind::Transport,
            Self::InvalidResponse(_) => ErrorKind::InvalidResponse,
            Self::Config(_) => ErrorKind::Config,
            Self::Verification(_) => ErrorKind::Verification,
            Self::Backend(_) => ErrorKind::Backend,
        }
    }

    /// Returns the HTTP status carried by an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Narrows a generic API error into the resource-specific kind.
    ///
    /// 404 becomes [`AdminError::NotFound`] and 409 becomes
    /// [`AdminError::Conflict`]; anything else is returned unchanged.
    #[must_use]
    pub(crate) fn for_resource(self, resource_type: &'static str, id: &str) -> Self {
        match self {
            Self::Api { status: 404, .. } => Self::NotFound {
                resource_type,
                id: id.to_string(),
            },
            Self::Api { status: 409, .. } => Self::Conflict {
                resource_type,
                id: id.to_string(),
            },
            other => other,
        }
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
