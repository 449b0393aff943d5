//! # hub-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

pub use auth::{
    hash_password, validate_password_strength, verify_password, Claims, JwtService, TokenPair,
    TokenType,
};
pub use config::{
    AiConfig, AppConfig, AppSettings, ConfigError, CookieConfig, CorsConfig, DatabaseConfig,
    Environment, IdConfig, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig, WalletConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
