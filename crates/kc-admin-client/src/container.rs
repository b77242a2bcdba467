//! Keycloak backend running in a throwaway container.

use std::time::Duration;

use async_trait::async_trait;
use testcontainers::core::IntoContainerPort;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};
use tracing::{info, warn};

use crate::backend::Backend;
use crate::config::AdminConfig;
use crate::error::{AdminError, AdminResult};

/// HTTP port inside the container.
pub const KEYCLOAK_PORT: u16 = 8080;

/// Keycloak started in dev mode with a bootstrap admin.
///
/// Dropping the handle removes the container even if [`Backend::stop`] was
/// never reached.
pub struct KeycloakContainer {
    image: String,
    tag: String,
    bootstrap_username: String,
    bootstrap_password: String,
    log_level: String,
    startup_timeout: Duration,
    container: Option<ContainerAsync<GenericImage>>,
}

impl KeycloakContainer {
    /// Describes a container from configuration. Nothing is started yet.
    #[must_use]
    pub fn from_config(config: &AdminConfig) -> Self {
        Self {
            image: config.image.clone(),
            tag: config.image_tag.clone(),
            bootstrap_username: config.bootstrap_username.clone(),
            bootstrap_password: config.bootstrap_password.clone(),
            log_level: config.log_level.clone(),
            startup_timeout: config.startup_timeout(),
            container: None,
        }
    }

    /// Whether the container is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.container.is_some()
    }
}

impl std::fmt::Debug for KeycloakContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeycloakContainer")
            .field("image", &format!("{}:{}", self.image, self.tag))
            .field("running", &self.container.is_some())
            .finish()
    }
}

fn backend_error(context: &str, err: impl std::fmt::Display) -> AdminError {
    AdminError::Backend(format!("{context}: {err}"))
}

#[async_trait]
impl Backend for KeycloakContainer {
    async fn start(&mut self) -> AdminResult<String> {
        if self.container.is_some() {
            return Err(AdminError::Backend("container already started".to_string()));
        }

        info!(image = %self.image, tag = %self.tag, "starting keycloak container");
        let container = GenericImage::new(self.image.clone(), self.tag.clone())
            .with_exposed_port(KEYCLOAK_PORT.tcp())
            .with_env_var("KC_BOOTSTRAP_ADMIN_USERNAME", self.bootstrap_username.clone())
            .with_env_var("KC_BOOTSTRAP_ADMIN_PASSWORD", self.bootstrap_password.clone())
            .with_env_var("KC_LOG_LEVEL", self.log_level.clone())
            .with_cmd(["start-dev"])
            .with_startup_timeout(self.startup_timeout)
            .start()
            .await
            .map_err(|e| backend_error("failed to start container", e))?;

        let host = container
            .get_host()
            .await
            .map_err(|e| backend_error("failed to resolve container host", e))?;
        let port = container
            .get_host_port_ipv4(KEYCLOAK_PORT.tcp())
            .await
            .map_err(|e| backend_error("failed to resolve mapped port", e))?;
        self.container = Some(container);

        let url = format!("http://{host}:{port}");
        info!(%url, "keycloak container started");
        Ok(url)
    }

    async fn console_output(&self) -> String {
        let Some(container) = &self.container else {
            return String::new();
        };

        let mut output = String::new();
        match container.stdout_to_vec().await {
            Ok(bytes) => output.push_str(&String::from_utf8_lossy(&bytes)),
            Err(e) => warn!(error = %e, "failed to read container stdout"),
        }
        match container.stderr_to_vec().await {
            Ok(bytes) => output.push_str(&String::from_utf8_lossy(&bytes)),
            Err(e) => warn!(error = %e, "failed to read container stderr"),
        }
        output
    }

    async fn stop(&mut self) -> AdminResult<()> {
        let Some(container) = self.container.take() else {
            return Ok(());
        };

        container
            .stop()
            .await
            .map_err(|e| backend_error("failed to stop container", e))?;
        container
            .rm()
            .await
            .map_err(|e| backend_error("failed to remove container", e))?;
        info!("keycloak container stopped");
        Ok(())
    }
}
