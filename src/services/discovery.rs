use std::slice;
use std::sync::Arc;

use thiserror::Error;

use crate::core::{build_exclusion_set, MatchFinder};
use crate::models::{MatchNotification, MatchStatus, PetPurpose, PotentialMatch};
use crate::services::notifier::MatchNotifier;
use crate::services::repository::{
    MatchRepository, OwnerRepository, PetQuery, PetRepository, RepositoryError,
};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Pet not found: {0}")]
    PetNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of an on-demand discovery request
#[derive(Debug)]
pub struct DiscoveryOutcome {
    pub matches: Vec<PotentialMatch>,
    pub total_candidates: usize,
    pub notifications_sent: usize,
}

/// Result of the new-pet fan-out
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FanOutOutcome {
    pub pets_scanned: usize,
    pub notifications_sent: usize,
}

/// Runs match discovery against the repositories and fans out notifications
///
/// Ranked results can be obtained without side effects through
/// [`DiscoveryService::find_potential_matches`]; notification is a separate
/// step layered on top.
#[derive(Clone)]
pub struct DiscoveryService {
    pets: Arc<dyn PetRepository>,
    owners: Arc<dyn OwnerRepository>,
    matches: Arc<dyn MatchRepository>,
    notifier: MatchNotifier,
    finder: MatchFinder,
}

impl DiscoveryService {
    pub fn new(
        pets: Arc<dyn PetRepository>,
        owners: Arc<dyn OwnerRepository>,
        matches: Arc<dyn MatchRepository>,
        notifier: MatchNotifier,
        finder: MatchFinder,
    ) -> Self {
        Self {
            pets,
            owners,
            matches,
            notifier,
            finder,
        }
    }

    /// Ranked potential matches for `pet_id` without notifying anyone
    ///
    /// Returns the matches and the size of the candidate pool they came from.
    pub async fn find_potential_matches(
        &self,
        pet_id: &str,
        purpose: Option<PetPurpose>,
    ) -> Result<(Vec<PotentialMatch>, usize), DiscoveryError> {
        let source = self
            .pets
            .get_pet(pet_id)
            .await?
            .ok_or_else(|| DiscoveryError::PetNotFound(pet_id.to_string()))?;

        let preferences = self.owners.get_preferences(&source.owner_id).await?;

        let existing = self
            .matches
            .matches_for_pet(pet_id, &MatchStatus::ACTIVE)
            .await?;
        let mut excluded = build_exclusion_set(pet_id, &existing);
        excluded.insert(source.id.clone());

        tracing::debug!(
            "Excluding {} pets for {} ({} active matches)",
            excluded.len(),
            pet_id,
            existing.len()
        );

        let query = PetQuery {
            exclude_ids: excluded,
            species: Some(source.species.clone()),
        };
        let pool = self.pets.find_pets(&query).await?;

        tracing::debug!("Candidate pool for {}: {} pets", pet_id, pool.len());

        let matches = self
            .finder
            .find_potential_matches(&source, &pool, preferences.as_ref(), purpose);

        Ok((matches, pool.len()))
    }

    /// On-demand discovery requested by the owner of `pet_id`
    ///
    /// Every result notifies the candidate's owner that `pet_id` is interested.
    pub async fn discover(
        &self,
        pet_id: &str,
        purpose: Option<PetPurpose>,
    ) -> Result<DiscoveryOutcome, DiscoveryError> {
        tracing::info!("Finding potential matches for pet {} with purpose filter {:?}", pet_id, purpose);

        let (matches, total_candidates) = self.find_potential_matches(pet_id, purpose).await?;

        let notifications = matches.iter().map(|m| {
            MatchNotification::new(m.pet.owner_id.clone(), &m.pet, pet_id, m.distance_km)
        });
        let notifications_sent = self.notifier.notify_all(notifications).await;

        tracing::info!(
            "Returning {} potential matches for pet {} (from {} candidates, {} notified)",
            matches.len(),
            pet_id,
            total_candidates,
            notifications_sent
        );

        Ok(DiscoveryOutcome {
            matches,
            total_candidates,
            notifications_sent,
        })
    }

    /// Tell existing owners about a newly created pet
    ///
    /// Each existing pet is treated as a source with `{new pet}` as its whole
    /// candidate pool, using its own owner's preferences. Pets whose owner has
    /// no stored preferences are skipped. A failed lookup skips that pet only.
    pub async fn announce_new_pet(&self, new_pet_id: &str) -> Result<FanOutOutcome, DiscoveryError> {
        let new_pet = self
            .pets
            .get_pet(new_pet_id)
            .await?
            .ok_or_else(|| DiscoveryError::PetNotFound(new_pet_id.to_string()))?;

        if new_pet.valid_location().is_none() {
            tracing::info!("New pet {} has no usable location, nothing to announce", new_pet_id);
            return Ok(FanOutOutcome::default());
        }

        let query = PetQuery::excluding([new_pet.id.clone()]).with_species(new_pet.species.clone());
        let existing = self.pets.find_pets(&query).await?;

        let mut outcome = FanOutOutcome::default();

        for pet in &existing {
            let preferences = match self.owners.get_preferences(&pet.owner_id).await {
                Ok(Some(preferences)) => preferences,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(
                        "Skipping pet {}: failed to load preferences for owner {}: {}",
                        pet.id,
                        pet.owner_id,
                        e
                    );
                    continue;
                }
            };
            outcome.pets_scanned += 1;

            let found = self.finder.find_potential_matches(
                pet,
                slice::from_ref(&new_pet),
                Some(&preferences),
                None,
            );

            for m in found {
                let notification =
                    MatchNotification::new(pet.owner_id.clone(), &m.pet, pet.id.clone(), m.distance_km);
                if self.notifier.notify(&notification).await {
                    outcome.notifications_sent += 1;
                }
            }
        }

        tracing::info!(
            "Checked new pet {} against {} existing pets ({} notifications)",
            new_pet_id,
            outcome.pets_scanned,
            outcome.notifications_sent
        );

        Ok(outcome)
    }
}
