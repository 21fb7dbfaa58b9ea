// Core algorithm exports
pub mod compatibility;
pub mod distance;
pub mod exclusion;
pub mod matcher;

pub use compatibility::{is_compatible, purposes_compatible};
pub use distance::{distance_between, haversine_distance};
pub use exclusion::build_exclusion_set;
pub use matcher::MatchFinder;
