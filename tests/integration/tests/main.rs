//! End-to-End Integration Tests
//!
//! These tests run the profile workflow against a real Keycloak started with
//! testcontainers. They need Docker and are ignored by default:
//!
//! ```text
//! cargo test -p kc-integration-tests -- --ignored
//! ```

mod common;
mod profile_lifecycle;
mod workflow;
