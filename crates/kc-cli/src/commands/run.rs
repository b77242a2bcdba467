//! Full workflow run.

#[cfg(feature = "container")]
use kc_admin_client::KeycloakContainer;
use kc_admin_client::{AdminConfig, Backend, ExternalBackend, ProfilePlan, Workflow};

use crate::cli::RunArgs;
use crate::output::{console_dump, error, output, success, OutputFormat};

use super::profile::AttributeDisplay;

/// Runs the workflow against `server`, or a fresh container when `None`.
pub async fn run_workflow(
    args: RunArgs,
    config: &AdminConfig,
    server: Option<String>,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    let plan = ProfilePlan::with_names(args.realm, args.attributes);

    match server {
        Some(url) => execute(ExternalBackend::new(url), config, &plan, output_format).await,
        None => run_in_container(config, &plan, output_format).await,
    }
}

#[cfg(feature = "container")]
async fn run_in_container(
    config: &AdminConfig,
    plan: &ProfilePlan,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    execute(KeycloakContainer::from_config(config), config, plan, output_format).await
}

#[cfg(not(feature = "container"))]
async fn run_in_container(
    _config: &AdminConfig,
    _plan: &ProfilePlan,
    _output_format: OutputFormat,
) -> crate::CliResult<()> {
    Err(crate::CliError::InvalidArgument(
        "no server given and container support is disabled; pass --server".to_string(),
    ))
}

async fn execute<B: Backend>(
    backend: B,
    config: &AdminConfig,
    plan: &ProfilePlan,
    output_format: OutputFormat,
) -> crate::CliResult<()> {
    let mut workflow = Workflow::new(backend, config.clone());
    let result = workflow.run(plan).await;

    let states: Vec<String> = workflow.history().iter().map(ToString::to_string).collect();
    tracing::info!(states = ?states, "workflow finished");
    console_dump(workflow.console_output());

    match result {
        Ok(report) => {
            output(&AttributeDisplay::rows(&report.updated), output_format)?;
            success(&format!(
                "Realm '{}' configured and verified ({} attribute(s))",
                report.realm,
                report.updated.attributes.len()
            ));
            Ok(())
        }
        Err(e) => {
            error(&format!("workflow stopped in state: {}", workflow.state()));
            Err(e.into())
        }
    }
}
