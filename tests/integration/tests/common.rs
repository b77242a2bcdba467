//! Common test utilities and fixtures.

use kc_admin_client::{
    AdminClient, AdminConfig, Backend, KeycloakContainer, ReadinessGate, UserProfileAttribute,
};

/// Test environment owning a Keycloak container and an admin client.
pub struct TestEnv {
    /// Keycloak container.
    container: KeycloakContainer,
    /// Authenticated admin client.
    pub client: AdminClient,
}

/// Initializes tracing for tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("kc_admin_client=debug,info")
        .with_test_writer()
        .try_init();
}

/// Configuration for test containers.
pub fn test_config() -> AdminConfig {
    AdminConfig {
        startup_timeout_secs: 120,
        ..AdminConfig::default()
    }
}

impl TestEnv {
    /// Starts Keycloak, waits for it and logs in as the bootstrap admin.
    pub async fn new() -> anyhow::Result<Self> {
        init_tracing();
        let config = test_config();

        let mut container = KeycloakContainer::from_config(&config);
        let base_url = container.start().await?;

        ReadinessGate::from_config(&config)?
            .wait_until_ready(&base_url, config.startup_timeout())
            .await?;
        let client = AdminClient::from_config(&base_url, &config).await?;

        Ok(Self { container, client })
    }

    /// Stops the container, logging its console output.
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        let output = self.container.console_output().await;
        self.container.stop().await?;
        tracing::info!("================== KEYCLOAK STDOUT ==================");
        tracing::info!("{}", output);
        Ok(())
    }
}

/// Realm name unique to one test.
pub fn unique_realm(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}

/// Attributes from bare names.
pub fn attributes(names: &[&str]) -> Vec<UserProfileAttribute> {
    names.iter().map(|n| UserProfileAttribute::new(*n)).collect()
}
