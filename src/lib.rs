//! SNIF Match - potential-match discovery for the SNIF pet platform
//!
//! Given a pet and its owner's preferences, finds compatible pets within the
//! owner's search radius, ranked closest first, and notifies the owners on
//! the other side of each match.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_exclusion_set, haversine_distance, is_compatible, MatchFinder};
pub use models::{Gender, Location, Match, MatchStatus, OwnerPreferences, Pet, PetPurpose, PotentialMatch};
pub use services::{DiscoveryService, MatchNotifier, NotificationPublisher};
