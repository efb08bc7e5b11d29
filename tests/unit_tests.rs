// Unit tests for the Shelter Match client library

use shelter_match::models::{
    Dog, SearchCriteria, SearchDogsResponse, SortDirection, SortField, SortSpec,
    DEFAULT_PAGE_SIZE,
};
use shelter_match::SelectionSet;
use validator::Validate;

fn create_dog(id: &str, name: &str, age: u8, breed: &str) -> Dog {
    Dog {
        id: id.to_string(),
        img: format!("https://img.shelter.test/{}.jpg", id),
        name: name.to_string(),
        age,
        zip_code: "98101".to_string(),
        breed: breed.to_string(),
    }
}

#[test]
fn test_dog_deserializes_from_backend_shape() {
    let json = r#"{
        "id": "d1",
        "img": "https://img.shelter.test/d1.jpg",
        "name": "Rex",
        "age": 4,
        "zip_code": "98101",
        "breed": "Beagle"
    }"#;

    let dog: Dog = serde_json::from_str(json).unwrap();
    assert_eq!(dog.id, "d1");
    assert_eq!(dog.age, 4);
    assert_eq!(dog.zip_code, "98101");
}

#[test]
fn test_criteria_validation_accepts_sane_bounds() {
    let criteria = SearchCriteria {
        breeds: vec!["Beagle".to_string()],
        age_min: Some(0),
        age_max: Some(15),
        ..Default::default()
    };
    assert!(criteria.validate().is_ok());
}

#[test]
fn test_criteria_validation_rejects_inverted_bounds() {
    let criteria = SearchCriteria {
        age_min: Some(10),
        age_max: Some(2),
        ..Default::default()
    };

    let errors = criteria.validate().unwrap_err();
    assert!(!errors.errors().is_empty());
}

#[test]
fn test_criteria_validation_rejects_absurd_age() {
    let criteria = SearchCriteria {
        age_min: Some(200),
        ..Default::default()
    };
    assert!(criteria.validate().is_err());
}

#[test]
fn test_criteria_default_page_size() {
    assert_eq!(SearchCriteria::default().page_size, DEFAULT_PAGE_SIZE);
}

#[test]
fn test_sort_spec_wire_format() {
    let spec = SortSpec::new(SortField::Name, SortDirection::Desc);
    assert_eq!(spec.to_string(), "name:desc");
    assert_eq!("name:desc".parse::<SortSpec>().unwrap(), spec);
}

#[test]
fn test_selection_double_toggle_is_identity() {
    let mut selection = SelectionSet::new();
    selection.toggle(create_dog("d1", "Rex", 4, "Beagle"));

    let size_before = selection.len();
    let ids_before = selection.ids();

    let added = selection.toggle(create_dog("d2", "Fido", 2, "Poodle"));
    assert!(added);
    let removed = !selection.toggle(create_dog("d2", "Fido", 2, "Poodle"));
    assert!(removed);

    assert_eq!(selection.len(), size_before);
    assert_eq!(selection.ids(), ids_before);
}

#[test]
fn test_selection_keyed_by_identifier_not_fields() {
    let mut selection = SelectionSet::new();
    selection.toggle(create_dog("d1", "Rex", 4, "Beagle"));

    // Same id with different fields still toggles off
    selection.toggle(create_dog("d1", "Renamed", 9, "Poodle"));
    assert!(selection.is_empty());
}

#[test]
fn test_next_cursor_extraction() {
    let response = SearchDogsResponse {
        result_ids: vec!["d1".to_string()],
        total: 40,
        next: Some("/dogs/search?size=25&from=25".to_string()),
        prev: None,
    };
    assert_eq!(response.next_cursor().as_deref(), Some("25"));

    let exhausted = SearchDogsResponse {
        result_ids: vec!["d1".to_string()],
        total: 1,
        next: None,
        prev: None,
    };
    assert_eq!(exhausted.next_cursor(), None);
}

#[test]
fn test_search_response_optional_cursors_deserialize() {
    let json = r#"{"resultIds": ["d1", "d2"], "total": 2}"#;
    let response: SearchDogsResponse = serde_json::from_str(json).unwrap();

    assert_eq!(response.result_ids.len(), 2);
    assert_eq!(response.total, 2);
    assert!(response.next.is_none());
    assert!(response.prev.is_none());
}
