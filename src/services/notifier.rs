use std::sync::Arc;

use crate::models::MatchNotification;
use crate::services::publisher::NotificationPublisher;

/// Routing key used when all notifications share one key
pub const SHARED_ROUTING_KEY: &str = "pet.matches.found";

/// How notifications are keyed on the publish channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingStrategy {
    /// `matches.{ownerId}.{petId}`
    PerOwner,
    /// One fixed key for every notification
    Shared(String),
}

impl Default for RoutingStrategy {
    fn default() -> Self {
        RoutingStrategy::PerOwner
    }
}

impl RoutingStrategy {
    pub fn routing_key(&self, notification: &MatchNotification) -> String {
        match self {
            RoutingStrategy::PerOwner => {
                format!("matches.{}.{}", notification.owner_id, notification.matched_pet_id)
            }
            RoutingStrategy::Shared(key) => key.clone(),
        }
    }
}

/// Hands match notifications to the publisher
///
/// Each publish is independent: a failure is logged and the remaining
/// notifications still go out.
#[derive(Clone)]
pub struct MatchNotifier {
    publisher: Arc<dyn NotificationPublisher>,
    routing: RoutingStrategy,
}

impl MatchNotifier {
    pub fn new(publisher: Arc<dyn NotificationPublisher>, routing: RoutingStrategy) -> Self {
        Self { publisher, routing }
    }

    /// Publish one notification, returning whether it was accepted
    pub async fn notify(&self, notification: &MatchNotification) -> bool {
        let routing_key = self.routing.routing_key(notification);

        match self.publisher.publish(&routing_key, notification).await {
            Ok(()) => {
                tracing::debug!(
                    "Notified owner {} about pet {} ({:.1} km)",
                    notification.owner_id,
                    notification.matched_pet_id,
                    notification.distance_km
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to publish match notification to {}: {}",
                    routing_key,
                    e
                );
                false
            }
        }
    }

    /// Publish notifications in order, returning how many were accepted
    pub async fn notify_all<I>(&self, notifications: I) -> usize
    where
        I: IntoIterator<Item = MatchNotification>,
    {
        let mut sent = 0;
        for notification in notifications {
            if self.notify(&notification).await {
                sent += 1;
            }
        }
        sent
    }
}
