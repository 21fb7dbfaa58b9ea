// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Gender, Location, Match, MatchNotification, MatchStatus, OwnerPreferences, Pet, PetPurpose,
    PotentialMatch, DEFAULT_MATCH_EXPIRY_DAYS, DEFAULT_SEARCH_RADIUS_KM,
};
pub use requests::{PetCreatedRequest, PotentialMatchesQuery};
pub use responses::{
    ErrorResponse, HealthResponse, PetCreatedResponse, PotentialMatchResponse,
    PotentialMatchesResponse,
};
