//! # kc-admin-client
//!
//! Admin REST client for managing Keycloak realms and user-profile schemas.
//!
//! This crate provides:
//! - An authenticated transport with implicit session renewal
//! - Realm creation and lookup
//! - Wholesale read/replace of a realm's user-profile attribute schema
//! - A readiness gate for backends that are still starting
//! - A workflow orchestrator that runs create, read, replace, read and verify
//!   against a backend it starts and always stops
//!
//! ## Example
//!
//! ```no_run
//! use kc_admin_client::{AdminClient, AdminConfig, ProfileSchemaManager, UserProfileAttribute};
//!
//! # async fn example() -> kc_admin_client::AdminResult<()> {
//! let config = AdminConfig::from_env()?;
//! let client = AdminClient::from_config("http://localhost:8080", &config).await?;
//! let profiles = ProfileSchemaManager::new(&client);
//!
//! let mut schema = profiles.get_schema("demo").await?;
//! schema.attributes.push(UserProfileAttribute::new("custom"));
//! profiles.replace_config("demo", &schema).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod backend;
#[cfg(feature = "container")]
pub mod container;
pub mod config;
pub mod error;
pub mod profile;
pub mod readiness;
pub mod realm;
pub mod session;
pub mod transport;
pub mod workflow;

pub use backend::{Backend, ExternalBackend};
pub use config::AdminConfig;
#[cfg(feature = "container")]
pub use container::KeycloakContainer;
pub use error::{AdminError, AdminResult, ErrorKind};
pub use profile::{validate_attributes, ProfileSchemaManager, UserProfileAttribute, UserProfileSchema};
pub use readiness::ReadinessGate;
pub use realm::{RealmManager, RealmRepresentation};
pub use session::AdminSession;
pub use transport::{AdminClient, Credentials};
pub use workflow::{
    verify_relative_order, ProfilePlan, SchemaReadPhase, Workflow, WorkflowReport, WorkflowState,
};
