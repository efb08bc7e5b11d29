use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::domain::{Coordinates, SortSpec};

/// Page size used when the caller does not choose one
pub const DEFAULT_PAGE_SIZE: u8 = 25;

/// Oldest age the search form accepts
pub const MAX_DOG_AGE: u8 = 30;

/// The active filter/sort selection driving a dog search
///
/// Replaced wholesale on each submission; absent optional fields are
/// omitted from the wire request rather than sent empty. `age_min` and
/// `age_max` use explicit presence so that a minimum age of zero is
/// distinguishable from "no minimum".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_age_bounds"))]
pub struct SearchCriteria {
    #[serde(default)]
    pub breeds: Vec<String>,
    #[serde(default)]
    #[serde(alias = "zipCodes", rename = "zipCodes")]
    pub zip_codes: Vec<String>,
    #[validate(range(max = 30))]
    #[serde(default)]
    #[serde(alias = "ageMin", rename = "ageMin")]
    pub age_min: Option<u8>,
    #[validate(range(max = 30))]
    #[serde(default)]
    #[serde(alias = "ageMax", rename = "ageMax")]
    pub age_max: Option<u8>,
    #[serde(default)]
    pub sort: SortSpec,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_page_size")]
    #[serde(alias = "pageSize", rename = "pageSize")]
    pub page_size: u8,
}

fn default_page_size() -> u8 {
    DEFAULT_PAGE_SIZE
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            breeds: Vec::new(),
            zip_codes: Vec::new(),
            age_min: None,
            age_max: None,
            sort: SortSpec::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Reject criteria where the minimum age exceeds the maximum
fn validate_age_bounds(criteria: &SearchCriteria) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (criteria.age_min, criteria.age_max) {
        if min > max {
            let mut err = ValidationError::new("age_min_exceeds_age_max");
            err.message = Some("minimum age must not exceed maximum age".into());
            return Err(err);
        }
    }
    Ok(())
}

/// Query body for `POST /locations/search`
///
/// Absent optional fields are omitted from the serialized body entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationSearchQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
    #[serde(rename = "geoBoundingBox", skip_serializing_if = "Option::is_none")]
    pub geo_bounding_box: Option<GeoBoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
}

/// Geographic bounding box for a location search
///
/// The backend accepts either the four edge coordinates or a
/// bottom-left/top-right corner pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoBoundingBox {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_left: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_right: Option<Coordinates>,
}
