//! Server status check.

use kc_admin_client::{AdminConfig, ReadinessGate};

use crate::output::success;

/// Waits until the server answers, within the configured startup timeout.
pub async fn run_status(config: &AdminConfig, server: &str) -> crate::CliResult<()> {
    let attempts = ReadinessGate::from_config(config)?
        .wait_until_ready(server, config.startup_timeout())
        .await?;
    success(&format!("Server {server} is ready ({attempts} probe(s))"));
    Ok(())
}
