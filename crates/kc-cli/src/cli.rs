//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// Keycloak user-profile administration tool.
#[derive(Debug, Parser)]
#[command(name = "kc-profile")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Server URL (overrides config).
    #[arg(short, long, global = true)]
    pub server: Option<String>,

    /// Configuration file (defaults to ~/.keycloak/kc-profile.toml).
    #[arg(short, long, global = true, env = "KC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wait until the server accepts requests.
    Status,

    /// Realm management commands.
    #[command(subcommand)]
    Realm(RealmCommand),

    /// User-profile schema commands.
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Run the full create/replace/verify workflow.
    Run(RunArgs),

    /// Show the effective configuration.
    Config,
}

/// Realm commands.
#[derive(Debug, Subcommand)]
pub enum RealmCommand {
    /// Create a new realm.
    Create {
        /// Realm name.
        name: String,
    },

    /// Get realm details.
    Get {
        /// Realm name.
        name: String,
    },
}

/// User-profile commands.
#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show the realm's attributes in order.
    Show {
        /// Realm name.
        realm: String,
    },

    /// Replace the realm's profile with a JSON configuration file.
    Apply {
        /// Realm name.
        realm: String,

        /// File holding `{ "attributes": [...] }`.
        file: PathBuf,
    },

    /// Replace the realm's attributes with exactly these names.
    Set {
        /// Realm name.
        realm: String,

        /// Attribute names, in order.
        #[arg(required = true)]
        names: Vec<String>,
    },
}

/// Arguments for the workflow run.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Realm to create.
    #[arg(long, default_value = "demo")]
    pub realm: String,

    /// Attribute names to install, in order.
    #[arg(default_values = ["username", "email", "custom"])]
    pub attributes: Vec<String>,
}
