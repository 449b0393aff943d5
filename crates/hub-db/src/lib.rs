//! # hub-db
//!
//! PostgreSQL implementations of the repository traits defined in
//! `hub-core`, built on SQLx runtime queries.
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - Repository implementations
//!
//! ```rust,ignore
//! use hub_db::{create_pool, run_migrations, DatabaseConfig, PgMemberRepository};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! run_migrations(&pool, hub_db::DEFAULT_MIGRATIONS_DIR).await?;
//! let members = PgMemberRepository::new(pool);
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool, DEFAULT_MIGRATIONS_DIR};
pub use repositories::{
    PgChatRepository, PgCommentRepository, PgCouponRepository, PgLedgerRepository,
    PgLikeRepository, PgMemberRepository, PgPostRepository, PgRoadmapRepository,
};
