// Service exports
pub mod cache;
pub mod directory;
pub mod discovery;
pub mod memory;
pub mod notifier;
pub mod publisher;
pub mod repository;

pub use cache::{CacheKey, CachedOwnerRepository};
pub use directory::PetDirectoryClient;
pub use discovery::{DiscoveryError, DiscoveryOutcome, DiscoveryService, FanOutOutcome};
pub use memory::InMemoryStore;
pub use notifier::{MatchNotifier, RoutingStrategy, SHARED_ROUTING_KEY};
pub use publisher::{NotificationPublisher, PublishError, RedisPublisher};
pub use repository::{MatchRepository, OwnerRepository, PetQuery, PetRepository, RepositoryError};
