//! Command implementations.

pub mod config;
pub mod profile;
pub mod realm;
pub mod run;
pub mod status;

pub use config::run_config;
pub use profile::run_profile;
pub use realm::run_realm;
pub use run::run_workflow;
pub use status::run_status;

use kc_admin_client::{AdminClient, AdminConfig, ReadinessGate};

/// Waits for the server, then authenticates against it.
pub async fn connect(config: &AdminConfig, server: &str) -> crate::CliResult<AdminClient> {
    ReadinessGate::from_config(config)?
        .wait_until_ready(server, config.startup_timeout())
        .await?;
    Ok(AdminClient::from_config(server, config).await?)
}
