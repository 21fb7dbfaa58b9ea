use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::PetPurpose;

/// Query string for on-demand discovery
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PotentialMatchesQuery {
    #[serde(default)]
    pub purpose: Option<PetPurpose>,
}

/// Notification that a pet was just created
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PetCreatedRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "pet_id", rename = "petId")]
    pub pet_id: String,
}
