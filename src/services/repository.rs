use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Match, MatchStatus, OwnerPreferences, Pet};

/// Errors raised by data backends
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Filter for fetching a set of pets
#[derive(Debug, Clone, Default)]
pub struct PetQuery {
    pub exclude_ids: HashSet<String>,
    pub species: Option<String>,
}

impl PetQuery {
    pub fn excluding<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude_ids: ids.into_iter().map(Into::into).collect(),
            species: None,
        }
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    pub fn matches(&self, pet: &Pet) -> bool {
        !self.exclude_ids.contains(&pet.id)
            && self.species.as_ref().map_or(true, |s| *s == pet.species)
    }
}

#[async_trait]
pub trait PetRepository: Send + Sync {
    async fn get_pet(&self, pet_id: &str) -> Result<Option<Pet>, RepositoryError>;

    async fn find_pets(&self, query: &PetQuery) -> Result<Vec<Pet>, RepositoryError>;
}

#[async_trait]
pub trait OwnerRepository: Send + Sync {
    async fn get_preferences(
        &self,
        owner_id: &str,
    ) -> Result<Option<OwnerPreferences>, RepositoryError>;
}

#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Matches referencing `pet_id` on either side whose status is in `statuses`
    async fn matches_for_pet(
        &self,
        pet_id: &str,
        statuses: &[MatchStatus],
    ) -> Result<Vec<Match>, RepositoryError>;
}
