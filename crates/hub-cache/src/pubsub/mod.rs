//! Redis Pub/Sub delivery of domain events
//!
//! Channel names come from `EventChannel::name`: `chat_room:{id}` and
//! `member:{id}`.

mod publisher;

pub use publisher::RedisEventPublisher;
