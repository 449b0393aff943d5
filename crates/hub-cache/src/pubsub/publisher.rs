//! Redis Pub/Sub publisher.

use async_trait::async_trait;
use hub_core::{DomainEvent, EventChannel, EventPublisher, RepoResult};
use redis::AsyncCommands;

use crate::pool::{RedisPool, RedisResult};

/// Publishes domain events as JSON to Redis channels
#[derive(Clone)]
pub struct RedisEventPublisher {
    pool: RedisPool,
}

impl RedisEventPublisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    async fn publish_json(&self, channel_name: &str, payload: &str) -> RedisResult<u64> {
        let mut conn = self.pool.get().await?;
        let receivers: u64 = conn.publish(channel_name, payload).await?;
        Ok(receivers)
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, channel: EventChannel, event: &DomainEvent) -> RepoResult<u64> {
        let channel_name = channel.name();
        let payload = serde_json::to_string(event).map_err(crate::RedisPoolError::from)?;

        let receivers = self.publish_json(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = event.event_type(),
            receivers,
            "Published event"
        );
        Ok(receivers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hub_core::events::ChatRoomClosedEvent;
    use hub_core::Id;

    #[test]
    fn test_payload_carries_event_type() {
        let event = DomainEvent::ChatRoomClosed(ChatRoomClosedEvent {
            room_id: Id::new(9),
            timestamp: Utc::now(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"CHAT_ROOM_CLOSED\""));
        assert!(json.contains("\"room_id\":\"9\""));
    }

    #[test]
    fn test_publisher_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RedisEventPublisher>();
    }
}
