use crate::models::{
    Dog, Identity, Location, LocationSearchQuery, MatchResponse, SearchCriteria,
    SearchDogsResponse, SearchLocationsResponse,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the adoption backend
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The backend answered 401: the session cookie is missing or expired.
    /// Distinguished from [`GatewayError::RequestFailed`] so callers can
    /// force a logout instead of showing a generic error.
    #[error("session invalid: backend returned 401 Unauthorized")]
    Unauthorized,

    #[error("API request failed with status {status}")]
    RequestFailed { status: u16 },

    #[error("invalid response format: {0}")]
    InvalidResponse(String),
}

/// Adoption backend API client
///
/// Handles all communication with the Shelter Match backend including:
/// - Session login/logout
/// - Breed listing and dog search
/// - Resolving dog identifiers to full records
/// - Computing a match from a set of favorites
///
/// Credential material rides on cookies, so the underlying client keeps a
/// cookie store; a 401 on any operation surfaces as
/// [`GatewayError::Unauthorized`].
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Log in, establishing the session cookie
    pub async fn login(&self, identity: &Identity) -> Result<(), GatewayError> {
        let url = format!("{}/auth/login", self.base_url);

        tracing::debug!("Logging in as {}", identity.email);

        self.send(self.client.post(&url).json(identity)).await?;
        Ok(())
    }

    /// Log out, invalidating the session cookie on the backend
    pub async fn logout(&self) -> Result<(), GatewayError> {
        let url = format!("{}/auth/logout", self.base_url);
        self.send(self.client.post(&url)).await?;
        Ok(())
    }

    /// Fetch the list of known breed names
    pub async fn list_breeds(&self) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/dogs/breeds", self.base_url);
        let response = self.send(self.client.get(&url)).await?;
        Self::parse_json(response).await
    }

    /// Search for dogs matching the criteria, returning one page of
    /// identifiers plus continuation information
    ///
    /// Only present filters are serialized as query parameters; absent
    /// optional fields are omitted from the request entirely.
    pub async fn search_dogs(
        &self,
        criteria: &SearchCriteria,
        cursor: Option<&str>,
    ) -> Result<SearchDogsResponse, GatewayError> {
        let query = search_query(criteria, cursor);
        let url = format!("{}/dogs/search?{}", self.base_url, query);

        tracing::debug!("Searching dogs: {}", url);

        let response = self.send(self.client.get(&url)).await?;
        Self::parse_json(response).await
    }

    /// Resolve dog identifiers to full records
    ///
    /// An empty identifier list resolves to an empty result without
    /// issuing a request; the backend contract forbids an empty body.
    pub async fn get_dogs_by_ids(&self, ids: &[String]) -> Result<Vec<Dog>, GatewayError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/dogs", self.base_url);
        let response = self.send(self.client.post(&url).json(ids)).await?;
        Self::parse_json(response).await
    }

    /// Ask the backend to compute a single match from the selected dogs
    pub async fn match_dogs(&self, ids: &[String]) -> Result<MatchResponse, GatewayError> {
        let url = format!("{}/dogs/match", self.base_url);

        tracing::debug!("Requesting match from {} dogs", ids.len());

        let response = self.send(self.client.post(&url).json(ids)).await?;
        Self::parse_json(response).await
    }

    /// Resolve ZIP codes to location records
    pub async fn get_locations(&self, zip_codes: &[String]) -> Result<Vec<Location>, GatewayError> {
        if zip_codes.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/locations", self.base_url);
        let response = self.send(self.client.post(&url).json(zip_codes)).await?;
        Self::parse_json(response).await
    }

    /// Search locations by city, state, or bounding box
    pub async fn search_locations(
        &self,
        query: &LocationSearchQuery,
    ) -> Result<SearchLocationsResponse, GatewayError> {
        let url = format!("{}/locations/search", self.base_url);
        let response = self.send(self.client.post(&url).json(query)).await?;
        Self::parse_json(response).await
    }

    /// Issue a request and normalize the response status
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, GatewayError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(GatewayError::Unauthorized);
        }
        if !status.is_success() {
            tracing::debug!("Request failed with status {}", status);
            return Err(GatewayError::RequestFailed {
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Parse a successful response body per operation schema
    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to parse body: {}", e)))
    }
}

/// Build the sparse query string for a dog search
///
/// List filters append one parameter per element; optional scalars are
/// emitted only when present. Values are percent-encoded.
fn search_query(criteria: &SearchCriteria, cursor: Option<&str>) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::new();

    for breed in &criteria.breeds {
        pairs.push(("breeds", breed.clone()));
    }
    for zip in &criteria.zip_codes {
        pairs.push(("zipCodes", zip.clone()));
    }
    if let Some(min) = criteria.age_min {
        pairs.push(("ageMin", min.to_string()));
    }
    if let Some(max) = criteria.age_max {
        pairs.push(("ageMax", max.to_string()));
    }
    pairs.push(("size", criteria.page_size.to_string()));
    if let Some(from) = cursor {
        pairs.push(("from", from.to_string()));
    }
    pairs.push(("sort", criteria.sort.to_string()));

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortDirection, SortField, SortSpec};

    #[test]
    fn test_client_creation_normalizes_base_url() {
        let client = ApiClient::new("https://api.shelter.test/", Duration::from_secs(30));
        assert_eq!(client.base_url, "https://api.shelter.test");
    }

    #[test]
    fn test_search_query_omits_absent_filters() {
        let criteria = SearchCriteria::default();
        let query = search_query(&criteria, None);
        assert_eq!(query, "size=25&sort=breed%3Aasc");
    }

    #[test]
    fn test_search_query_full_criteria() {
        let criteria = SearchCriteria {
            breeds: vec!["Beagle".to_string(), "Basset Hound".to_string()],
            zip_codes: vec!["98101".to_string()],
            age_min: Some(0),
            age_max: Some(5),
            sort: SortSpec::new(SortField::Age, SortDirection::Desc),
            page_size: 10,
        };

        let query = search_query(&criteria, Some("20"));
        assert_eq!(
            query,
            "breeds=Beagle&breeds=Basset%20Hound&zipCodes=98101\
             &ageMin=0&ageMax=5&size=10&from=20&sort=age%3Adesc"
        );
    }

    #[test]
    fn test_search_query_keeps_explicit_zero_minimum() {
        // A zero minimum is a real filter, not an absent one
        let criteria = SearchCriteria {
            age_min: Some(0),
            ..Default::default()
        };
        assert!(search_query(&criteria, None).contains("ageMin=0"));
    }
}
