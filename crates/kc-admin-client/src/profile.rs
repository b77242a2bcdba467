//! User-profile attribute schema management.
//!
//! The schema is read and replaced as a whole. There is deliberately no merge
//! operation: to add one attribute, fetch the schema, edit it locally and
//! replace it with the full sequence.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{AdminError, AdminResult};
use crate::transport::AdminClient;

/// One attribute of a realm's user profile.
///
/// Only the name is interpreted; display metadata, validations, permissions
/// and anything else the server sends are passed through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileAttribute {
    /// Attribute name, unique within a schema.
    pub name: String,

    /// Display name shown in forms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Pass-through metadata.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfileAttribute {
    /// Creates an attribute with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            extra: Map::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets a pass-through metadata field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Ordered user-profile schema of a realm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfileSchema {
    /// Attributes in display order.
    #[serde(default)]
    pub attributes: Vec<UserProfileAttribute>,

    /// Other top-level settings, such as attribute groups.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfileSchema {
    /// Creates a schema holding exactly these attributes.
    #[must_use]
    pub fn new(attributes: Vec<UserProfileAttribute>) -> Self {
        Self {
            attributes,
            extra: Map::new(),
        }
    }

    /// Attribute names in order.
    #[must_use]
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&UserProfileAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Checks that names are present and unique.
    pub fn validate(&self) -> AdminResult<()> {
        validate_attributes(&self.attributes)
    }
}

/// Checks that every attribute has a non-empty name and no name repeats.
pub fn validate_attributes(attributes: &[UserProfileAttribute]) -> AdminResult<()> {
    let mut seen = HashSet::with_capacity(attributes.len());
    for (position, attribute) in attributes.iter().enumerate() {
        if attribute.name.trim().is_empty() {
            return Err(AdminError::Validation(format!(
                "attribute at position {position} has an empty name"
            )));
        }
        if !seen.insert(attribute.name.as_str()) {
            return Err(AdminError::Validation(format!(
                "duplicate attribute name: {}",
                attribute.name
            )));
        }
    }
    Ok(())
}

/// Reads and replaces user-profile schemas.
///
/// No call is retried here. A failed replace can be re-issued verbatim: the
/// same payload always produces the same schema.
#[derive(Debug, Clone, Copy)]
pub struct ProfileSchemaManager<'a> {
    client: &'a AdminClient,
}

impl<'a> ProfileSchemaManager<'a> {
    /// Creates a schema manager over an authenticated client.
    #[must_use]
    pub const fn new(client: &'a AdminClient) -> Self {
        Self { client }
    }

    /// Gets the active schema of a realm, including provider defaults.
    pub async fn get_schema(&self, realm: &str) -> AdminResult<UserProfileSchema> {
        let url = self.client.admin_url(&["realms", realm, "users", "profile"])?;
        let schema: UserProfileSchema = self
            .client
            .get_json(url)
            .await
            .map_err(|e| e.for_resource("realm", realm))?;

        debug!(realm, attributes = ?schema.attribute_names(), "profile fetched");
        Ok(schema)
    }

    /// Replaces the realm's attributes with exactly this sequence.
    ///
    /// Attributes missing from `attributes` are removed from the realm.
    pub async fn replace_schema(
        &self,
        realm: &str,
        attributes: &[UserProfileAttribute],
    ) -> AdminResult<()> {
        self.replace_config(realm, &UserProfileSchema::new(attributes.to_vec()))
            .await
    }

    /// Replaces the realm's whole profile configuration.
    ///
    /// Fails with [`AdminError::Validation`] before any request is sent if a
    /// name is empty or repeated.
    pub async fn replace_config(&self, realm: &str, schema: &UserProfileSchema) -> AdminResult<()> {
        schema.validate()?;

        let url = self.client.admin_url(&["realms", realm, "users", "profile"])?;
        self.client
            .put_json(url, schema)
            .await
            .map_err(|e| e.for_resource("realm", realm))?;

        info!(realm, attributes = ?schema.attribute_names(), "profile updated");
        Ok(())
    }
}
