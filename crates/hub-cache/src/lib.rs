//! # hub-cache
//!
//! Redis layer for refresh-token sessions and pub/sub event delivery.
//!
//! - **Connection Pool**: managed Redis connections with deadpool
//! - **Sessions**: [`RedisSessionStore`] implements `SessionStore`
//! - **Pub/Sub**: [`RedisEventPublisher`] implements `EventPublisher`
//!
//! ```ignore
//! use hub_cache::{RedisEventPublisher, RedisPool, RedisPoolConfig, RedisSessionStore};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let sessions = RedisSessionStore::with_ttl(pool.clone(), 1_209_600);
//! let publisher = RedisEventPublisher::new(pool);
//! ```

pub mod pool;
pub mod pubsub;
pub mod session;

pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use pubsub::RedisEventPublisher;
pub use session::RedisSessionStore;
