use crate::core::{compatibility::is_compatible, distance::distance_between};
use crate::models::{OwnerPreferences, Pet, PetPurpose, PotentialMatch, DEFAULT_SEARCH_RADIUS_KM};
use validator::Validate;

/// Potential-match finder
///
/// # Pipeline Stages
/// 1. Radius resolution (owner preference or default)
/// 2. Compatibility filtering
/// 3. Haversine distance + inclusive radius cutoff
/// 4. Ranking by ascending distance
///
/// No I/O and no shared state.
#[derive(Debug, Clone, Copy)]
pub struct MatchFinder {
    default_radius_km: f64,
}

impl MatchFinder {
    pub fn new(default_radius_km: f64) -> Self {
        Self { default_radius_km }
    }

    pub fn with_default_radius() -> Self {
        Self::new(DEFAULT_SEARCH_RADIUS_KM)
    }

    pub fn default_radius_km(&self) -> f64 {
        self.default_radius_km
    }

    /// Search radius to apply for the given owner preferences
    ///
    /// Missing or invalid preferences (out of range, NaN) fall back to the
    /// default radius.
    pub fn effective_radius(&self, preferences: Option<&OwnerPreferences>) -> f64 {
        match preferences {
            Some(prefs) if prefs.search_radius_km.is_finite() && prefs.validate().is_ok() => {
                prefs.search_radius_km
            }
            Some(prefs) => {
                tracing::warn!(
                    "Ignoring invalid search radius {} for owner {}, using default {}",
                    prefs.search_radius_km,
                    prefs.owner_id,
                    self.default_radius_km
                );
                self.default_radius_km
            }
            None => self.default_radius_km,
        }
    }

    /// Find potential matches for `source` within `candidates`
    ///
    /// # Arguments
    /// * `source` - Pet the search is run for
    /// * `candidates` - Pool already stripped of the exclusion set
    /// * `preferences` - Source owner's preferences, if any
    /// * `purpose_filter` - Restrict to one purpose
    ///
    /// # Returns
    /// Matches sorted by ascending distance. Equal distances keep pool order.
    pub fn find_potential_matches(
        &self,
        source: &Pet,
        candidates: &[Pet],
        preferences: Option<&OwnerPreferences>,
        purpose_filter: Option<PetPurpose>,
    ) -> Vec<PotentialMatch> {
        let Some(origin) = source.valid_location() else {
            return Vec::new();
        };

        let radius_km = self.effective_radius(preferences);

        let mut matches: Vec<PotentialMatch> = candidates
            .iter()
            .filter(|candidate| is_compatible(source, candidate, purpose_filter, preferences))
            .filter_map(|candidate| {
                let location = candidate.valid_location()?;
                let distance_km = distance_between(&origin, &location);

                (distance_km <= radius_km).then(|| PotentialMatch {
                    pet: candidate.clone(),
                    distance_km,
                })
            })
            .collect();

        // Stable, so ties keep pool order
        matches.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        matches
    }
}

impl Default for MatchFinder {
    fn default() -> Self {
        Self::with_default_radius()
    }
}
