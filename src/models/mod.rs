// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Coordinates, Dog, Identity, Location, ParseSortError, SortDirection, SortField, SortSpec};
pub use requests::{GeoBoundingBox, LocationSearchQuery, SearchCriteria, DEFAULT_PAGE_SIZE, MAX_DOG_AGE};
pub use responses::{MatchResponse, SearchDogsResponse, SearchLocationsResponse};
