//! User-profile schema commands.

use std::path::Path;

use kc_admin_client::{
    AdminConfig, ProfileSchemaManager, UserProfileAttribute, UserProfileSchema,
};
use serde::Serialize;
use tabled::Tabled;

use crate::cli::ProfileCommand;
use crate::output::{output, success, OutputFormat};

use super::connect;

/// Attribute representation for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct AttributeDisplay {
    /// Position in the schema.
    #[tabled(rename = "#")]
    pub position: usize,
    /// Attribute name.
    #[tabled(rename = "Name")]
    pub name: String,
    /// Display name.
    #[tabled(rename = "Display Name")]
    pub display_name: String,
}

impl AttributeDisplay {
    /// Builds display rows from a schema.
    #[must_use]
    pub fn rows(schema: &UserProfileSchema) -> Vec<Self> {
        schema
            .attributes
            .iter()
            .enumerate()
            .map(|(i, attribute)| Self {
                position: i + 1,
                name: attribute.name.clone(),
                display_name: attribute.display_name.clone().unwrap_or_default(),
            })
            .collect()
    }
}

/// Runs a profile command.
pub async fn run_profile(
    cmd: ProfileCommand,
    config: &AdminConfig,
    server: &str,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    let client = connect(config, server).await?;
    let profiles = ProfileSchemaManager::new(&client);

    match cmd {
        ProfileCommand::Show { realm } => {
            let schema = profiles.get_schema(&realm).await?;
            output(&AttributeDisplay::rows(&schema), output_format)
        }
        ProfileCommand::Apply { realm, file } => {
            let schema = read_schema(&file)?;
            profiles.replace_config(&realm, &schema).await?;
            success(&format!(
                "Profile of realm '{}' replaced with {} attribute(s)",
                realm,
                schema.attributes.len()
            ));
            Ok(())
        }
        ProfileCommand::Set { realm, names } => {
            let attributes: Vec<UserProfileAttribute> =
                names.into_iter().map(UserProfileAttribute::new).collect();
            profiles.replace_schema(&realm, &attributes).await?;
            success(&format!(
                "Profile of realm '{}' replaced with {} attribute(s)",
                realm,
                attributes.len()
            ));
            Ok(())
        }
    }
}

/// Reads a profile configuration file.
pub fn read_schema(path: &Path) -> crate::CliResult<UserProfileSchema> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_numbered_from_one() {
        let schema = UserProfileSchema::new(vec![
            UserProfileAttribute::new("username").with_display_name("${username}"),
            UserProfileAttribute::new("custom"),
        ]);

        let rows = AttributeDisplay::rows(&schema);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].position, 1);
        assert_eq!(rows[0].display_name, "${username}");
        assert_eq!(rows[1].name, "custom");
        assert_eq!(rows[1].display_name, "");
    }
}
