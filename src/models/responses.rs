use serde::{Deserialize, Serialize};

use crate::models::domain::Location;

/// Response body for `GET /dogs/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDogsResponse {
    /// Identifiers of the dogs matching the search, one page at a time
    #[serde(alias = "resultIds", rename = "resultIds")]
    pub result_ids: Vec<String>,
    /// Total number of results across all pages
    pub total: u64,
    /// Query string for the next page of results
    #[serde(default)]
    pub next: Option<String>,
    /// Query string for the previous page of results
    #[serde(default)]
    pub prev: Option<String>,
}

impl SearchDogsResponse {
    /// Extract the continuation cursor from the backend's `next` query
    /// string, i.e. the value of its `from` parameter.
    ///
    /// `next` may arrive as a bare query string or as a path with a
    /// query string attached; both forms are handled.
    pub fn next_cursor(&self) -> Option<String> {
        let next = self.next.as_deref()?;
        let query = match next.rsplit_once('?') {
            Some((_, q)) => q,
            None => next,
        };

        for pair in query.split('&') {
            if let Some(("from", value)) = pair.split_once('=') {
                if value.is_empty() {
                    return None;
                }
                let decoded = urlencoding::decode(value)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| value.to_string());
                return Some(decoded);
            }
        }

        None
    }
}

/// Response body for `POST /dogs/match`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResponse {
    /// Identifier of the matched dog
    #[serde(rename = "match")]
    pub match_id: String,
}

/// Response body for `POST /locations/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchLocationsResponse {
    pub results: Vec<Location>,
    pub total: u64,
}
