//! Container-backed integration tests for the Keycloak admin client.
//!
//! The tests live under `tests/`; this crate has no library code.
