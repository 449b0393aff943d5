//! Integration test utilities for the roadmap hub
//!
//! Helpers for running end-to-end tests against the REST API backed by a
//! real PostgreSQL and Redis.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
