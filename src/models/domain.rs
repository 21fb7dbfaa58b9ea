use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default search radius used when an owner has no usable preferences
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 50.0;

/// Days until a freshly created match expires
pub const DEFAULT_MATCH_EXPIRY_DAYS: i64 = 7;

/// Declared intent for a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PetPurpose {
    Breeding,
    Playdate,
    Adoption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

/// Point on the globe in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Build a location, rejecting out-of-range coordinates
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let location = Self { latitude, longitude };
        location.is_valid().then_some(location)
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Pet as seen by the matching core. Owned and persisted elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default = "default_gender")]
    pub gender: Gender,
    #[serde(default)]
    pub age: u8,
    #[serde(default)]
    pub purposes: Vec<PetPurpose>,
    #[serde(default)]
    pub location: Option<Location>,
    pub owner_id: String,
}

impl Pet {
    /// Location usable for matching; out-of-range coordinates count as absent
    pub fn valid_location(&self) -> Option<Location> {
        self.location.filter(Location::is_valid)
    }

    pub fn has_purpose(&self, purpose: PetPurpose) -> bool {
        self.purposes.contains(&purpose)
    }

    /// Purposes declared by both pets, in this pet's declaration order
    pub fn shared_purposes(&self, other: &Pet) -> Vec<PetPurpose> {
        self.purposes
            .iter()
            .copied()
            .filter(|p| other.has_purpose(*p))
            .collect()
    }
}

fn default_gender() -> Gender {
    Gender::Unknown
}

/// Owner matching preferences
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OwnerPreferences {
    pub owner_id: String,
    #[validate(range(min = 1.0, max = 500.0))]
    #[serde(default = "default_search_radius")]
    pub search_radius_km: f64,
}

impl OwnerPreferences {
    pub fn new(owner_id: impl Into<String>, search_radius_km: f64) -> Self {
        Self {
            owner_id: owner_id.into(),
            search_radius_km,
        }
    }
}

fn default_search_radius() -> f64 {
    DEFAULT_SEARCH_RADIUS_KM
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
}

impl MatchStatus {
    /// Statuses that keep both pets out of fresh candidate pools
    pub const ACTIVE: [MatchStatus; 2] = [MatchStatus::Pending, MatchStatus::Accepted];

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Pending => "Pending",
            MatchStatus::Accepted => "Accepted",
            MatchStatus::Rejected => "Rejected",
            MatchStatus::Expired => "Expired",
        }
    }
}

/// Match between two pets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: String,
    pub initiator_pet_id: String,
    pub target_pet_id: String,
    pub purpose: PetPurpose,
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Match {
    /// New pending match expiring after the default window
    pub fn pending(
        initiator_pet_id: impl Into<String>,
        target_pet_id: impl Into<String>,
        purpose: PetPurpose,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            initiator_pet_id: initiator_pet_id.into(),
            target_pet_id: target_pet_id.into(),
            purpose,
            status: MatchStatus::Pending,
            created_at: now,
            expires_at: Some(now + Duration::days(DEFAULT_MATCH_EXPIRY_DAYS)),
        }
    }

    pub fn involves(&self, pet_id: &str) -> bool {
        self.initiator_pet_id == pet_id || self.target_pet_id == pet_id
    }

    /// Whether `expires_at` has passed
    ///
    /// Informational only. Flipping a lapsed match to `Expired` is the match
    /// store's job; until it does, the match still counts by its status.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Transient (pet, distance) pair produced by a discovery query
#[derive(Debug, Clone)]
pub struct PotentialMatch {
    pub pet: Pet,
    pub distance_km: f64,
}

/// Payload handed to the notification publisher for one discovered pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchNotification {
    pub notification_id: uuid::Uuid,
    /// Owner receiving the notification
    pub owner_id: String,
    pub matched_pet_id: String,
    /// Owner of the matched pet
    pub matched_owner_id: String,
    pub pet_name: String,
    pub species: String,
    pub breed: String,
    pub distance_km: f64,
    pub source_pet_id: String,
    pub notified_at: DateTime<Utc>,
}

impl MatchNotification {
    /// Describe `matched` to `owner_id`, found from `source_pet_id`'s side
    pub fn new(
        owner_id: impl Into<String>,
        matched: &Pet,
        source_pet_id: impl Into<String>,
        distance_km: f64,
    ) -> Self {
        Self {
            notification_id: uuid::Uuid::new_v4(),
            owner_id: owner_id.into(),
            matched_pet_id: matched.id.clone(),
            matched_owner_id: matched.owner_id.clone(),
            pet_name: matched.name.clone(),
            species: matched.species.clone(),
            breed: matched.breed.clone(),
            distance_km,
            source_pet_id: source_pet_id.into(),
            notified_at: Utc::now(),
        }
    }
}
