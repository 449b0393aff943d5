//! Application configuration
//!
//! Loaded from environment variables (optionally seeded from `.env`).

use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub cookie: CookieConfig,
    pub id: IdConfig,
    pub wallet: WalletConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Seconds
    pub access_token_expiry: i64,
    /// Seconds
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst: u32,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Token cookies issued alongside JSON bodies
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub enabled: bool,
    pub secure: bool,
    pub domain: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IdConfig {
    pub worker_id: u16,
}

/// Virtual currency rules
#[derive(Debug, Clone)]
pub struct WalletConfig {
    pub weekly_ticket_amount: i64,
    pub tokens_per_ticket: i64,
    pub roadmap_ticket_cost: i64,
    /// Six-field cron expression (seconds first)
    pub weekly_distribution_cron: String,
    pub distribution_batch_size: i64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            weekly_ticket_amount: 5,
            tokens_per_ticket: 10,
            roadmap_ticket_cost: 1,
            weekly_distribution_cron: "0 0 0 * * *".to_string(),
            distribution_batch_size: 500,
        }
    }
}

/// OpenAI-compatible chat-completions endpoint for roadmap generation
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_url: String,
    /// Without a key the template generator is used
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &'static str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingVar(key))
    }

    fn parsed<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|_| ConfigError::InvalidValue(key, raw))
            })
            .transpose()
    }

    fn parsed_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        Ok(self.parsed(key)?.unwrap_or(default))
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        // a missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let env = match vars.get("APP_ENV") {
            Some(raw) => {
                Environment::parse(&raw).ok_or(ConfigError::InvalidValue("APP_ENV", raw))?
            }
            None => Environment::default(),
        };

        let wallet_defaults = WalletConfig::default();
        let ai_defaults = AiConfig::default();

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(|| "roadmap-hub".to_string()),
                env,
            },
            api: ServerConfig {
                host: vars.get("API_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port: vars
                    .parsed("API_PORT")?
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parsed_or("DATABASE_MAX_CONNECTIONS", 20)?,
                min_connections: vars.parsed_or("DATABASE_MIN_CONNECTIONS", 5)?,
            },
            redis: RedisConfig {
                url: vars.required("REDIS_URL")?,
                max_connections: vars.parsed_or("REDIS_MAX_CONNECTIONS", 10)?,
            },
            jwt: JwtConfig {
                secret: vars.required("JWT_SECRET")?,
                access_token_expiry: vars.parsed_or("JWT_ACCESS_TOKEN_EXPIRY", 1800)?,
                refresh_token_expiry: vars.parsed_or("JWT_REFRESH_TOKEN_EXPIRY", 1_209_600)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars.parsed_or("RATE_LIMIT_REQUESTS_PER_SECOND", 10)?,
                burst: vars.parsed_or("RATE_LIMIT_BURST", 50)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            cookie: CookieConfig {
                enabled: vars.parsed_or("COOKIE_AUTH", env.is_production())?,
                secure: vars.parsed_or("COOKIE_SECURE", env.is_production())?,
                domain: vars.get("COOKIE_DOMAIN"),
            },
            id: IdConfig {
                worker_id: vars.parsed_or("WORKER_ID", 0)?,
            },
            wallet: WalletConfig {
                weekly_ticket_amount: vars
                    .parsed_or("WEEKLY_TICKET_AMOUNT", wallet_defaults.weekly_ticket_amount)?,
                tokens_per_ticket: vars
                    .parsed_or("TOKENS_PER_TICKET", wallet_defaults.tokens_per_ticket)?,
                roadmap_ticket_cost: vars
                    .parsed_or("ROADMAP_TICKET_COST", wallet_defaults.roadmap_ticket_cost)?,
                weekly_distribution_cron: vars
                    .get("WEEKLY_DISTRIBUTION_CRON")
                    .unwrap_or(wallet_defaults.weekly_distribution_cron),
                distribution_batch_size: vars
                    .parsed_or("DISTRIBUTION_BATCH_SIZE", wallet_defaults.distribution_batch_size)?,
            },
            ai: AiConfig {
                api_url: vars.get("AI_API_URL").unwrap_or(ai_defaults.api_url),
                api_key: vars.get("AI_API_KEY"),
                model: vars.get("AI_MODEL").unwrap_or(ai_defaults.model),
                timeout_secs: vars.parsed_or("AI_TIMEOUT_SECS", ai_defaults.timeout_secs)?,
            },
        })
    }
}
