//! Orchestrated workflow against a fresh Keycloak container.

use kc_admin_client::{
    verify_relative_order, KeycloakContainer, ProfilePlan, Workflow, WorkflowState,
};

use crate::common::{init_tracing, test_config};

#[tokio::test]
#[ignore = "requires Docker"]
async fn demo_realm_profile_is_updated_and_verified() -> anyhow::Result<()> {
    init_tracing();
    let config = test_config();
    let backend = KeycloakContainer::from_config(&config);

    let mut workflow = Workflow::new(backend, config);
    let report = workflow
        .run(&ProfilePlan::with_names("demo", ["username", "email", "custom"]))
        .await?;

    assert!(report.initial.attribute("username").is_some());
    verify_relative_order(&["username", "email", "custom"], &report.updated)?;

    assert_eq!(workflow.state(), &WorkflowState::TornDown);
    assert!(!workflow.backend().is_running());
    assert!(report.console_output.contains("Keycloak"));
    Ok(())
}
