//! # kc-profile
//!
//! Command-line tool for Keycloak user-profile administration.

#![forbid(unsafe_code)]
#![deny(warnings)]

use clap::Parser;
use kc_cli::{
    cli::{Cli, Command},
    commands::{run_config, run_profile, run_realm, run_status, run_workflow},
    config::{load_config, server_url},
    output::error,
    CliResult,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "kc_admin_client=debug,kc_cli=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = execute(cli).await {
        error(&e.to_string());
        std::process::exit(1);
    }
}

async fn execute(cli: Cli) -> CliResult<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Status => {
            let server = server_url(&config, cli.server.as_deref())?;
            run_status(&config, &server).await
        }
        Command::Realm(cmd) => {
            let server = server_url(&config, cli.server.as_deref())?;
            run_realm(cmd, &config, &server, cli.output).await
        }
        Command::Profile(cmd) => {
            let server = server_url(&config, cli.server.as_deref())?;
            run_profile(cmd, &config, &server, cli.output).await
        }
        Command::Run(args) => {
            let server = cli.server.or_else(|| config.server_url.clone());
            run_workflow(args, &config, server, cli.output).await
        }
        Command::Config => run_config(&config, cli.output),
    }
}
