//! Configuration structs

mod app_config;

pub use app_config::{
    AiConfig, AppConfig, AppSettings, ConfigError, CookieConfig, CorsConfig, DatabaseConfig,
    Environment, IdConfig, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig, WalletConfig,
};
