use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use thiserror::Error;

use crate::models::MatchNotification;

/// Errors that can occur when publishing notifications
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outbound channel for match notifications
///
/// Delivery guarantees belong to the implementation; callers do not retry.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(
        &self,
        routing_key: &str,
        notification: &MatchNotification,
    ) -> Result<(), PublishError>;
}

/// Publishes notifications as JSON over Redis pub/sub, one channel per routing key
pub struct RedisPublisher {
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
}

impl RedisPublisher {
    pub async fn new(redis_url: &str) -> Result<Self, PublishError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
        })
    }
}

#[async_trait]
impl NotificationPublisher for RedisPublisher {
    async fn publish(
        &self,
        routing_key: &str,
        notification: &MatchNotification,
    ) -> Result<(), PublishError> {
        let payload = serde_json::to_string(notification)?;

        let mut conn = self.redis.lock().await;
        let receivers: i64 = redis::cmd("PUBLISH")
            .arg(routing_key)
            .arg(payload)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("Published {} to {} subscribers", routing_key, receivers);
        Ok(())
    }
}
