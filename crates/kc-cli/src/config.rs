//! CLI configuration loading.

use std::path::{Path, PathBuf};

use kc_admin_client::AdminConfig;

/// Gets the default configuration file path.
pub fn config_path() -> crate::CliResult<PathBuf> {
    let home = dirs_next::home_dir()
        .ok_or_else(|| crate::CliError::Config("could not determine home directory".to_string()))?;
    Ok(home.join(".keycloak").join("kc-profile.toml"))
}

/// Loads configuration from an explicit file, or the default file if it exists.
///
/// Environment variables override file values in both cases.
pub fn load_config(explicit: Option<&Path>) -> crate::CliResult<AdminConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => config_path().ok().filter(|p| p.exists()),
    };
    Ok(AdminConfig::load(path.as_deref())?)
}

/// Resolves the server URL from the argument or configuration.
pub fn server_url(config: &AdminConfig, arg_server: Option<&str>) -> crate::CliResult<String> {
    arg_server
        .map(|s| s.to_string())
        .or_else(|| config.server_url.clone())
        .map(|s| s.trim_end_matches('/').to_string())
        .ok_or_else(|| {
            crate::CliError::InvalidArgument(
                "no server URL: pass --server or set KC_SERVER_URL".to_string(),
            )
        })
}

/// Masks a secret for display.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "****".to_string()
    }
}
