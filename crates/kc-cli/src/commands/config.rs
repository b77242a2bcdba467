//! Configuration display.

use kc_admin_client::AdminConfig;

use crate::config::mask_secret;
use crate::output::{info, output_single, OutputFormat};

/// Shows the effective configuration with the password masked.
pub fn run_config(config: &AdminConfig, output_format: OutputFormat) -> crate::CliResult<()> {
    let mut shown = config.clone();
    shown.bootstrap_password = mask_secret(&shown.bootstrap_password);

    if let Ok(path) = crate::config::config_path() {
        info(&format!("Configuration file: {}", path.display()));
    }
    output_single(&shown, output_format)
}
