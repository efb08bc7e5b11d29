use crate::core::context::AppContext;
use crate::core::selection::SelectionSet;
use crate::models::Dog;
use crate::services::GatewayError;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while resolving a match
#[derive(Debug, Error)]
pub enum MatchError {
    /// The backend contract requires at least one selected dog
    #[error("cannot request a match with no dogs selected")]
    EmptySelection,

    /// The backend returned a matched identifier it then failed to
    /// resolve to a record
    #[error("matched dog {0} missing from lookup")]
    MissingRecord(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Turns the current selection into a single matched dog
///
/// Sends the selected identifiers to the backend, resolves the returned
/// identifier to a full record, and holds the result until dismissed. On
/// failure any prior result is untouched; on success the selection is
/// cleared so the same set cannot be re-matched by accident.
pub struct MatchResolver {
    ctx: Arc<AppContext>,
    matched: Option<Dog>,
}

impl MatchResolver {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx, matched: None }
    }

    /// Ask the backend for a match among the selected dogs
    pub async fn request_match(&mut self, selection: &mut SelectionSet) -> Result<&Dog, MatchError> {
        if selection.is_empty() {
            return Err(MatchError::EmptySelection);
        }

        let ids = selection.ids();
        tracing::info!("Requesting match among {} dogs", ids.len());

        let response = self
            .ctx
            .authorized(self.ctx.gateway.match_dogs(&ids).await)?;

        let dogs = self.ctx.authorized(
            self.ctx
                .gateway
                .get_dogs_by_ids(std::slice::from_ref(&response.match_id))
                .await,
        )?;

        let dog = dogs
            .into_iter()
            .next()
            .ok_or_else(|| MatchError::MissingRecord(response.match_id.clone()))?;

        tracing::info!("Matched with {} ({})", dog.name, dog.id);
        selection.clear();
        Ok(self.matched.insert(dog))
    }

    /// The current match result, if one has not been dismissed
    pub fn matched(&self) -> Option<&Dog> {
        self.matched.as_ref()
    }

    /// Dismiss the current match result
    pub fn clear_match(&mut self) {
        self.matched = None;
    }
}
