use serde::{Deserialize, Serialize};
use crate::models::domain::{Gender, PetPurpose, PotentialMatch};

/// One ranked entry in a discovery response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotentialMatchResponse {
    pub pet_id: String,
    pub owner_id: String,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub gender: Gender,
    pub age: u8,
    pub purposes: Vec<PetPurpose>,
    pub distance_km: f64,
}

impl From<PotentialMatch> for PotentialMatchResponse {
    fn from(m: PotentialMatch) -> Self {
        Self {
            pet_id: m.pet.id,
            owner_id: m.pet.owner_id,
            name: m.pet.name,
            species: m.pet.species,
            breed: m.pet.breed,
            gender: m.pet.gender,
            age: m.pet.age,
            purposes: m.pet.purposes,
            distance_km: m.distance_km,
        }
    }
}

/// Response for the potential matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotentialMatchesResponse {
    pub pet_id: String,
    pub matches: Vec<PotentialMatchResponse>,
    pub total_candidates: usize,
    pub notifications_sent: usize,
}

/// Response for the pet created hook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetCreatedResponse {
    pub pet_id: String,
    pub pets_scanned: usize,
    pub notifications_sent: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
