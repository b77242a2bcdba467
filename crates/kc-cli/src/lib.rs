//! # kc-cli
//!
//! Command-line front end for Keycloak user-profile administration.
//!
//! This crate provides command-line utilities for:
//! - Waiting for a server to become ready
//! - Realm creation and lookup
//! - Showing and replacing a realm's user-profile attributes
//! - Running the full create/replace/verify workflow against a throwaway container

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, CliResult};
