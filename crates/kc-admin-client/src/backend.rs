//! Handles for the Keycloak service a workflow runs against.
//!
//! A backend is started once, polled for readiness by the caller, and stopped
//! on every exit path. [`KeycloakContainer`](crate::KeycloakContainer) runs a
//! throwaway container; [`ExternalBackend`] points at a server someone else
//! manages.

use async_trait::async_trait;

use crate::error::AdminResult;

/// A Keycloak service with an explicit lifecycle.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Starts the service and returns its base URL.
    async fn start(&mut self) -> AdminResult<String>;

    /// Captured console output, for diagnostics on teardown.
    async fn console_output(&self) -> String;

    /// Stops the service. Calling it on a stopped backend is a no-op.
    async fn stop(&mut self) -> AdminResult<()>;
}

/// A server that is already running and is not owned by the workflow.
#[derive(Debug, Clone)]
pub struct ExternalBackend {
    url: String,
}

impl ExternalBackend {
    /// Wraps the base URL of a running server.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl Backend for ExternalBackend {
    async fn start(&mut self) -> AdminResult<String> {
        Ok(self.url.trim_end_matches('/').to_string())
    }

    async fn console_output(&self) -> String {
        String::new()
    }

    async fn stop(&mut self) -> AdminResult<()> {
        Ok(())
    }
}
