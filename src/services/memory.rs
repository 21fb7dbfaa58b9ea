use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Match, MatchStatus, OwnerPreferences, Pet};
use crate::services::repository::{
    MatchRepository, OwnerRepository, PetQuery, PetRepository, RepositoryError,
};

/// Snapshot-backed store implementing all repository traits
///
/// Pets are kept in insertion order so pool order is deterministic.
#[derive(Default)]
pub struct InMemoryStore {
    pets: RwLock<Vec<Pet>>,
    preferences: RwLock<HashMap<String, OwnerPreferences>>,
    matches: RwLock<Vec<Match>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a pet
    pub async fn upsert_pet(&self, pet: Pet) {
        let mut pets = self.pets.write().await;
        match pets.iter_mut().find(|p| p.id == pet.id) {
            Some(existing) => *existing = pet,
            None => pets.push(pet),
        }
    }

    pub async fn set_preferences(&self, preferences: OwnerPreferences) {
        self.preferences
            .write()
            .await
            .insert(preferences.owner_id.clone(), preferences);
    }

    pub async fn add_match(&self, m: Match) {
        self.matches.write().await.push(m);
    }

    pub async fn pet_count(&self) -> usize {
        self.pets.read().await.len()
    }
}

#[async_trait]
impl PetRepository for InMemoryStore {
    async fn get_pet(&self, pet_id: &str) -> Result<Option<Pet>, RepositoryError> {
        Ok(self.pets.read().await.iter().find(|p| p.id == pet_id).cloned())
    }

    async fn find_pets(&self, query: &PetQuery) -> Result<Vec<Pet>, RepositoryError> {
        Ok(self
            .pets
            .read()
            .await
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OwnerRepository for InMemoryStore {
    async fn get_preferences(
        &self,
        owner_id: &str,
    ) -> Result<Option<OwnerPreferences>, RepositoryError> {
        Ok(self.preferences.read().await.get(owner_id).cloned())
    }
}

#[async_trait]
impl MatchRepository for InMemoryStore {
    async fn matches_for_pet(
        &self,
        pet_id: &str,
        statuses: &[MatchStatus],
    ) -> Result<Vec<Match>, RepositoryError> {
        Ok(self
            .matches
            .read()
            .await
            .iter()
            .filter(|m| m.involves(pet_id) && statuses.contains(&m.status))
            .cloned()
            .collect())
    }
}
