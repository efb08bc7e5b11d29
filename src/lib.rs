//! Shelter Match - client library for the Shelter Match dog adoption service
//!
//! This library implements the presentation-independent core of the Shelter
//! Match application: an authenticated session against the adoption backend,
//! criteria-driven paginated dog browsing, a favorites selection, and
//! backend-computed match resolution.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::Settings;
pub use core::{
    AppContext, DogStream, FetchOutcome, MatchError, MatchResolver, SelectionSet, SessionError,
    SessionState, StreamError, StreamPhase,
};
pub use models::{Dog, Identity, SearchCriteria, SortSpec};
pub use services::{ApiClient, GatewayError, IdentityStore, JsonFileStore, MemoryStore};
