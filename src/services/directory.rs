use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::models::{Match, MatchStatus, OwnerPreferences, Pet};
use crate::services::repository::{
    MatchRepository, OwnerRepository, PetQuery, PetRepository, RepositoryError,
};

/// Pet directory API client
///
/// The surrounding application owns pets, owners and matches. This client
/// reads them over its REST API for:
/// - Fetching single pets and filtered pet pools
/// - Fetching owner preferences
/// - Fetching a pet's existing matches
pub struct PetDirectoryClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl PetDirectoryClient {
    /// Create a new directory client
    pub fn new(
        base_url: String,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON document, mapping 404 to `None`
    async fn get_optional<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, RepositoryError> {
        tracing::debug!("Fetching from directory: {}", url);

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .query(query)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Directory request {} failed: {} - {}", url, status, body);
            return Err(RepositoryError::Api(format!("{} returned {}", url, status)));
        }

        let json: Value = response.json().await?;

        serde_json::from_value(json)
            .map(Some)
            .map_err(|e| RepositoryError::InvalidResponse(format!("Failed to parse {}: {}", url, e)))
    }

    /// Parse a `{ "<field>": [...] }` list, skipping entries that fail to parse
    fn parse_list<T: DeserializeOwned>(json: &Value, field: &str) -> Result<Vec<T>, RepositoryError> {
        let items = json
            .get(field)
            .and_then(|d| d.as_array())
            .ok_or_else(|| RepositoryError::InvalidResponse(format!("Missing {} array", field)))?;

        Ok(items
            .iter()
            .filter_map(|item| match serde_json::from_value(item.clone()) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!("Skipping malformed {} entry: {}", field, e);
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl PetRepository for PetDirectoryClient {
    async fn get_pet(&self, pet_id: &str) -> Result<Option<Pet>, RepositoryError> {
        let url = self.url(&format!("/pets/{}", urlencoding::encode(pet_id)));
        self.get_optional(&url, &[]).await
    }

    async fn find_pets(&self, query: &PetQuery) -> Result<Vec<Pet>, RepositoryError> {
        let url = self.url("/pets");

        let mut params = Vec::new();
        if !query.exclude_ids.is_empty() {
            let mut ids: Vec<&str> = query.exclude_ids.iter().map(String::as_str).collect();
            ids.sort_unstable();
            params.push(("exclude", ids.join(",")));
        }
        if let Some(species) = &query.species {
            params.push(("species", species.clone()));
        }

        let json: Value = self
            .get_optional(&url, &params)
            .await?
            .ok_or_else(|| RepositoryError::Api(format!("{} returned 404", url)))?;

        let pets: Vec<Pet> = Self::parse_list(&json, "pets")?;

        // The backend filter is advisory; enforce it locally as well
        let pets: Vec<Pet> = pets.into_iter().filter(|p| query.matches(p)).collect();

        tracing::debug!("Queried {} pets from directory", pets.len());

        Ok(pets)
    }
}

#[async_trait]
impl OwnerRepository for PetDirectoryClient {
    async fn get_preferences(
        &self,
        owner_id: &str,
    ) -> Result<Option<OwnerPreferences>, RepositoryError> {
        let url = self.url(&format!("/owners/{}/preferences", urlencoding::encode(owner_id)));
        self.get_optional(&url, &[]).await
    }
}

#[async_trait]
impl MatchRepository for PetDirectoryClient {
    async fn matches_for_pet(
        &self,
        pet_id: &str,
        statuses: &[MatchStatus],
    ) -> Result<Vec<Match>, RepositoryError> {
        let url = self.url(&format!("/pets/{}/matches", urlencoding::encode(pet_id)));

        let status = statuses
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let json: Option<Value> = self.get_optional(&url, &[("status", status)]).await?;

        // Unknown pet means no matches
        let Some(json) = json else {
            return Ok(Vec::new());
        };

        let matches: Vec<Match> = Self::parse_list(&json, "matches")?;

        Ok(matches
            .into_iter()
            .filter(|m| m.involves(pet_id) && statuses.contains(&m.status))
            .collect())
    }
}
