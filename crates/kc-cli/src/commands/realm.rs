//! Realm management commands.

use kc_admin_client::{AdminConfig, RealmManager};

use crate::cli::RealmCommand;
use crate::output::{output_single, success, OutputFormat};

use super::connect;

/// Runs a realm command.
pub async fn run_realm(
    cmd: RealmCommand,
    config: &AdminConfig,
    server: &str,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    let client = connect(config, server).await?;
    let realms = RealmManager::new(&client);

    match cmd {
        RealmCommand::Create { name } => {
            realms.create_realm(&name).await?;
            success(&format!("Realm '{}' created successfully", name));
            Ok(())
        }
        RealmCommand::Get { name } => {
            let realm = realms.get_realm(&name).await?;
            output_single(&realm, output_format)
        }
    }
}
