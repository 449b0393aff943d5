//! # hub-api
//!
//! REST API server built with Axum framework, plus the cron scheduler that
//! drives the weekly ticket distribution.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod scheduler;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
