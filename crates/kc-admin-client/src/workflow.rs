//! Orchestrated profile-configuration workflow.
//!
//! A run moves strictly forward through [`WorkflowState`]: start the backend,
//! wait for it, authenticate, create the realm, read the schema, replace it,
//! read it again and verify. The first error moves the run to
//! [`WorkflowState::Failed`]. Whatever happens after the backend was asked to
//! start, it is stopped and its console output is logged before `run` returns.

use std::collections::HashSet;
use std::fmt;

use tracing::{error, info, warn};

use crate::backend::Backend;
use crate::config::AdminConfig;
use crate::error::{AdminError, AdminResult};
use crate::profile::{ProfileSchemaManager, UserProfileAttribute, UserProfileSchema};
use crate::readiness::ReadinessGate;
use crate::realm::RealmManager;
use crate::transport::AdminClient;

/// Which schema read a [`WorkflowState::SchemaRead`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaReadPhase {
    /// Before the replace.
    Initial,
    /// After the replace.
    Final,
}

/// Workflow state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    /// Nothing has happened yet.
    NotStarted,
    /// The backend is being started.
    BackendStarting,
    /// The backend answered the readiness probe.
    BackendReady,
    /// An admin session was obtained.
    Authenticated,
    /// The target realm was created.
    RealmEstablished,
    /// The schema was fetched.
    SchemaRead(SchemaReadPhase),
    /// The schema was replaced.
    SchemaReplaced,
    /// The final schema matched the replacement.
    Verified,
    /// The backend was stopped.
    TornDown,
    /// The run stopped on an error.
    Failed(String),
}

impl WorkflowState {
    /// Whether no further transitions happen except teardown.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::TornDown | Self::Failed(_))
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::BackendStarting => f.write_str("backend starting"),
            Self::BackendReady => f.write_str("backend ready"),
            Self::Authenticated => f.write_str("authenticated"),
            Self::RealmEstablished => f.write_str("realm established"),
            Self::SchemaRead(SchemaReadPhase::Initial) => f.write_str("schema read (initial)"),
            Self::SchemaRead(SchemaReadPhase::Final) => f.write_str("schema read (final)"),
            Self::SchemaReplaced => f.write_str("schema replaced"),
            Self::Verified => f.write_str("verified"),
            Self::TornDown => f.write_str("torn down"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// What a workflow run should configure.
#[derive(Debug, Clone)]
pub struct ProfilePlan {
    /// Realm to create and configure.
    pub realm: String,
    /// Attributes to install, in order.
    pub attributes: Vec<UserProfileAttribute>,
}

impl ProfilePlan {
    /// Creates a plan.
    #[must_use]
    pub fn new(realm: impl Into<String>, attributes: Vec<UserProfileAttribute>) -> Self {
        Self {
            realm: realm.into(),
            attributes,
        }
    }

    /// Creates a plan from bare attribute names.
    #[must_use]
    pub fn with_names<I, S>(realm: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            realm,
            names.into_iter().map(UserProfileAttribute::new).collect(),
        )
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    /// Configured realm.
    pub realm: String,
    /// Schema before the replace.
    pub initial: UserProfileSchema,
    /// Schema after the replace.
    pub updated: UserProfileSchema,
    /// Backend console output captured on teardown.
    pub console_output: String,
}

/// Checks that `expected` names appear in `actual` in the same relative order.
///
/// Attributes the server adds on its own are ignored.
pub fn verify_relative_order(expected: &[&str], actual: &UserProfileSchema) -> AdminResult<()> {
    let actual_names = actual.attribute_names();
    let present: HashSet<&str> = actual_names.iter().copied().collect();

    let missing: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|name| !present.contains(name))
        .collect();
    if !missing.is_empty() {
        return Err(AdminError::Verification(format!(
            "attributes missing after update: {}",
            missing.join(", ")
        )));
    }

    let mut remaining = expected.iter().copied().peekable();
    for name in &actual_names {
        if remaining.peek() == Some(name) {
            remaining.next();
        }
    }
    if remaining.peek().is_some() {
        return Err(AdminError::Verification(format!(
            "attribute order changed: expected {expected:?} within {actual_names:?}"
        )));
    }
    Ok(())
}

/// Sequences one profile-configuration run against a backend.
pub struct Workflow<B: Backend> {
    backend: B,
    config: AdminConfig,
    state: WorkflowState,
    history: Vec<WorkflowState>,
    console_output: String,
}

impl<B: Backend> Workflow<B> {
    /// Creates a workflow over a backend that has not been started.
    pub fn new(backend: B, config: AdminConfig) -> Self {
        Self {
            backend,
            config,
            state: WorkflowState::NotStarted,
            history: vec![WorkflowState::NotStarted],
            console_output: String::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Every state entered so far, in order.
    #[must_use]
    pub fn history(&self) -> &[WorkflowState] {
        &self.history
    }

    /// Console output captured on teardown.
    #[must_use]
    pub fn console_output(&self) -> &str {
        &self.console_output
    }

    /// The backend handle.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Runs the workflow once.
    ///
    /// Returns the first error encountered; the backend is torn down in
    /// every case.
    pub async fn run(&mut self, plan: &ProfilePlan) -> AdminResult<WorkflowReport> {
        if self.state != WorkflowState::NotStarted {
            return Err(AdminError::Backend(format!(
                "workflow already ran (state: {})",
                self.state
            )));
        }

        let outcome = self.drive(plan).await;
        if let Err(e) = &outcome {
            error!(state = %self.state, error = %e, "workflow failed");
            self.transition(WorkflowState::Failed(e.to_string()));
        }

        let teardown = self.teardown().await;
        let (initial, updated) = outcome?;
        teardown?;

        Ok(WorkflowReport {
            realm: plan.realm.clone(),
            initial,
            updated,
            console_output: self.console_output.clone(),
        })
    }

    async fn drive(
        &mut self,
        plan: &ProfilePlan,
    ) -> AdminResult<(UserProfileSchema, UserProfileSchema)> {
        self.transition(WorkflowState::BackendStarting);
        let base_url = self.backend.start().await?;

        let gate = ReadinessGate::from_config(&self.config)?;
        gate.wait_until_ready(&base_url, self.config.startup_timeout())
            .await?;
        self.transition(WorkflowState::BackendReady);

        let client = AdminClient::from_config(&base_url, &self.config).await?;
        self.transition(WorkflowState::Authenticated);

        RealmManager::new(&client).create_realm(&plan.realm).await?;
        self.transition(WorkflowState::RealmEstablished);

        let profiles = ProfileSchemaManager::new(&client);
        let initial = profiles.get_schema(&plan.realm).await?;
        log_attributes("initial", &initial);
        self.transition(WorkflowState::SchemaRead(SchemaReadPhase::Initial));

        profiles.replace_schema(&plan.realm, &plan.attributes).await?;
        self.transition(WorkflowState::SchemaReplaced);

        let updated = profiles.get_schema(&plan.realm).await?;
        log_attributes("final", &updated);
        self.transition(WorkflowState::SchemaRead(SchemaReadPhase::Final));

        let expected: Vec<&str> = plan.attributes.iter().map(|a| a.name.as_str()).collect();
        verify_relative_order(&expected, &updated)?;
        info!(realm = %plan.realm, "profile verified");
        self.transition(WorkflowState::Verified);

        Ok((initial, updated))
    }

    /// Captures console output and stops the backend.
    async fn teardown(&mut self) -> AdminResult<()> {
        self.console_output = self.backend.console_output().await;
        let stopped = self.backend.stop().await;

        info!("================== KEYCLOAK STDOUT ==================");
        info!("{}", self.console_output);

        match stopped {
            Ok(()) if matches!(self.state, WorkflowState::Failed(_)) => {
                // The failure stays the current state; teardown is only recorded.
                self.history.push(WorkflowState::TornDown);
                Ok(())
            }
            Ok(()) => {
                self.transition(WorkflowState::TornDown);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "backend teardown failed");
                if !matches!(self.state, WorkflowState::Failed(_)) {
                    self.transition(WorkflowState::Failed(e.to_string()));
                }
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: WorkflowState) {
        info!(from = %self.state, to = %next, "workflow transition");
        self.state = next.clone();
        self.history.push(next);
    }
}

fn log_attributes(phase: &str, schema: &UserProfileSchema) {
    for name in schema.attribute_names() {
        info!(phase, attribute = name, "profile attribute");
    }
}
