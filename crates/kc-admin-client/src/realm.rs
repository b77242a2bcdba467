//! Realm creation and lookup.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::error::{AdminError, AdminResult};
use crate::transport::AdminClient;

/// Realm representation.
///
/// Fields this crate does not interpret are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmRepresentation {
    /// Realm ID assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Realm name.
    pub realm: String,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Whether the realm is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Other realm settings.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RealmRepresentation {
    /// Creates an enabled realm with default settings.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            realm: name.into(),
            display_name: None,
            enabled: Some(true),
            extra: Map::new(),
        }
    }
}

/// Creates and looks up realms.
#[derive(Debug, Clone, Copy)]
pub struct RealmManager<'a> {
    client: &'a AdminClient,
}

impl<'a> RealmManager<'a> {
    /// Creates a realm manager over an authenticated client.
    #[must_use]
    pub const fn new(client: &'a AdminClient) -> Self {
        Self { client }
    }

    /// Creates a realm.
    ///
    /// Fails with [`AdminError::Conflict`] if the name is taken. The call is
    /// not retried: a realm is established once per workflow run.
    pub async fn create_realm(&self, name: &str) -> AdminResult<()> {
        self.create(&RealmRepresentation::new(name)).await
    }

    /// Creates a realm from a full representation.
    pub async fn create(&self, realm: &RealmRepresentation) -> AdminResult<()> {
        if realm.realm.trim().is_empty() {
            return Err(AdminError::Validation("realm name must not be empty".to_string()));
        }

        let url = self.client.admin_url(&["realms"])?;
        self.client
            .post_json(url, realm)
            .await
            .map_err(|e| e.for_resource("realm", &realm.realm))?;

        info!(realm = %realm.realm, "realm created");
        Ok(())
    }

    /// Gets a realm by name.
    pub async fn get_realm(&self, name: &str) -> AdminResult<RealmRepresentation> {
        let url = self.client.admin_url(&["realms", name])?;
        self.client
            .get_json(url)
            .await
            .map_err(|e| e.for_resource("realm", name))
    }

    /// Returns whether a realm with this name exists.
    pub async fn realm_exists(&self, name: &str) -> AdminResult<bool> {
        match self.get_realm(name).await {
            Ok(_) => Ok(true),
            Err(AdminError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
