//! Admin client configuration.
//!
//! Configuration is read from an optional TOML file and then overridden by
//! environment variables, so a checked-in file can hold defaults while CI
//! injects credentials.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AdminError, AdminResult};

/// Default Keycloak image.
pub const DEFAULT_IMAGE: &str = "quay.io/keycloak/keycloak";

/// Default Keycloak image tag.
pub const DEFAULT_IMAGE_TAG: &str = "26.2";

/// Upper bound for the startup and request timeouts, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Admin client configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// URL of an already running server. When unset a container is started.
    pub server_url: Option<String>,

    /// Container image for the managed backend.
    pub image: String,

    /// Container image tag.
    pub image_tag: String,

    /// Bootstrap admin principal.
    pub bootstrap_username: String,

    /// Bootstrap admin secret.
    pub bootstrap_password: String,

    /// Backend log level (`KC_LOG_LEVEL`).
    pub log_level: String,

    /// Realm the admin principal logs into.
    pub login_realm: String,

    /// Client used for the password grant.
    pub client_id: String,

    /// Maximum wait for the backend to become ready, in seconds.
    pub startup_timeout_secs: u64,

    /// Per-request timeout for admin calls, in seconds.
    pub request_timeout_secs: u64,

    /// Interval between readiness probes, in milliseconds.
    pub poll_interval_millis: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            image: DEFAULT_IMAGE.to_string(),
            image_tag: DEFAULT_IMAGE_TAG.to_string(),
            bootstrap_username: "admin".to_string(),
            bootstrap_password: "admin".to_string(),
            log_level: "INFO".to_string(),
            login_realm: "master".to_string(),
            client_id: "admin-cli".to_string(),
            startup_timeout_secs: 60,
            request_timeout_secs: 10,
            poll_interval_millis: 1000,
        }
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("server_url", &self.server_url)
            .field("image", &self.image)
            .field("image_tag", &self.image_tag)
            .field("bootstrap_username", &self.bootstrap_username)
            .field("bootstrap_password", &"<redacted>")
            .field("log_level", &self.log_level)
            .field("login_realm", &self.login_realm)
            .field("client_id", &self.client_id)
            .field("startup_timeout_secs", &self.startup_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("poll_interval_millis", &self.poll_interval_millis)
            .finish()
    }
}

impl AdminConfig {
    /// Loads configuration from an optional file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> AdminResult<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    AdminError::Config(format!("failed to read {}: {e}", path.display()))
                })?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from environment variables only.
    pub fn from_env() -> AdminResult<Self> {
        Self::load(None)
    }

    /// Parses configuration from TOML.
    pub fn from_toml_str(content: &str) -> AdminResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AdminError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from a variable lookup such as the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AdminResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("KC_SERVER_URL") {
            self.server_url = Some(url);
        }
        if let Some(image) = lookup("KC_IMAGE") {
            self.image = image;
        }
        if let Some(tag) = lookup("KC_IMAGE_TAG") {
            self.image_tag = tag;
        }
        if let Some(username) = lookup("KC_BOOTSTRAP_ADMIN_USERNAME") {
            self.bootstrap_username = username;
        }
        if let Some(password) = lookup("KC_BOOTSTRAP_ADMIN_PASSWORD") {
            self.bootstrap_password = password;
        }
        if let Some(level) = lookup("KC_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(realm) = lookup("KC_LOGIN_REALM") {
            self.login_realm = realm;
        }
        if let Some(client_id) = lookup("KC_CLIENT_ID") {
            self.client_id = client_id;
        }
        if let Some(v) = lookup("KC_STARTUP_TIMEOUT") {
            self.startup_timeout_secs = parse_number("KC_STARTUP_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("KC_REQUEST_TIMEOUT") {
            self.request_timeout_secs = parse_number("KC_REQUEST_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("KC_POLL_INTERVAL_MS") {
            self.poll_interval_millis = parse_number("KC_POLL_INTERVAL_MS", &v)?;
        }
        Ok(())
    }

    /// Checks that timeouts are usable.
    pub fn validate(&self) -> AdminResult<()> {
        check_timeout("startup timeout", self.startup_timeout_secs)?;
        check_timeout("request timeout", self.request_timeout_secs)?;
        if self.poll_interval_millis == 0 {
            return Err(AdminError::Config("poll interval must be positive".to_string()));
        }
        if self.poll_interval_millis > MAX_TIMEOUT_SECS * 1000 {
            return Err(AdminError::Config(format!(
                "poll interval must not exceed {MAX_TIMEOUT_SECS}s"
            )));
        }
        if self.bootstrap_username.is_empty() {
            return Err(AdminError::Config("bootstrap username is required".to_string()));
        }
        Ok(())
    }

    /// Maximum wait for readiness.
    #[must_use]
    pub const fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Interval between readiness probes.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }
}

fn check_timeout(what: &str, secs: u64) -> AdminResult<()> {
    if secs == 0 {
        return Err(AdminError::Config(format!("{what} must be positive")));
    }
    if secs > MAX_TIMEOUT_SECS {
        return Err(AdminError::Config(format!(
            "{what} must not exceed {MAX_TIMEOUT_SECS}s, got {secs}s"
        )));
    }
    Ok(())
}

fn parse_number(key: &str, value: &str) -> AdminResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| AdminError::Config(format!("{key} must be a non-negative integer, got {value:?}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::ErrorKind;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_bootstrap_container() {
        let config = AdminConfig::default();
        assert_eq!(config.bootstrap_username, "admin");
        assert_eq!(config.login_realm, "master");
        assert_eq!(config.client_id, "admin-cli");
        assert_eq!(config.startup_timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config = AdminConfig::from_toml_str(
            r#"
            server_url = "http://localhost:8080"
            bootstrap_password = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.server_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.bootstrap_password, "secret");
        assert_eq!(config.image_tag, DEFAULT_IMAGE_TAG);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = AdminConfig::from_toml_str("bootstrap_username = \"file-admin\"").unwrap();
        config
            .apply_overrides(lookup_from(&[
                ("KC_BOOTSTRAP_ADMIN_USERNAME", "env-admin"),
                ("KC_STARTUP_TIMEOUT", "90"),
                ("KC_LOG_LEVEL", "DEBUG"),
            ]))
            .unwrap();

        assert_eq!(config.bootstrap_username, "env-admin");
        assert_eq!(config.startup_timeout_secs, 90);
        assert_eq!(config.log_level, "DEBUG");
    }

    #[test]
    fn invalid_number_is_config_error() {
        let mut config = AdminConfig::default();
        let err = config
            .apply_overrides(lookup_from(&[("KC_REQUEST_TIMEOUT", "soon")]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = AdminConfig::from_toml_str("startup_timeout_secs = 0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn oversized_startup_timeout_is_rejected() {
        let mut config = AdminConfig::default();
        config
            .apply_overrides(lookup_from(&[("KC_STARTUP_TIMEOUT", "18446744073709551615")]))
            .unwrap();

        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("startup timeout"));
    }

    #[test]
    fn one_day_timeouts_are_accepted() {
        let config = AdminConfig {
            startup_timeout_secs: MAX_TIMEOUT_SECS,
            request_timeout_secs: MAX_TIMEOUT_SECS,
            ..AdminConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = AdminConfig {
            bootstrap_password: "hunter2-secret".to_string(),
            ..AdminConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("bootstrap_username"));
    }
}
