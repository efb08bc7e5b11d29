use crate::models::Dog;

/// The set of dogs the user has provisionally favorited
///
/// Keyed by identifier, insertion-ordered for stable display. Toggling is
/// idempotent under repeated pairs: toggling a dog twice returns the set
/// to its original membership.
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    dogs: Vec<Dog>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the dog if absent, remove it if present; returns whether the
    /// dog is selected afterwards
    pub fn toggle(&mut self, dog: Dog) -> bool {
        if let Some(pos) = self.dogs.iter().position(|d| d.id == dog.id) {
            self.dogs.remove(pos);
            false
        } else {
            self.dogs.push(dog);
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dogs.iter().any(|d| d.id == id)
    }

    /// Selected identifiers in insertion order
    pub fn ids(&self) -> Vec<String> {
        self.dogs.iter().map(|d| d.id.clone()).collect()
    }

    /// Selected dogs in insertion order
    pub fn dogs(&self) -> &[Dog] {
        &self.dogs
    }

    pub fn len(&self) -> usize {
        self.dogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    /// Empty the set unconditionally
    pub fn clear(&mut self) {
        self.dogs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog(id: &str) -> Dog {
        Dog {
            id: id.to_string(),
            img: format!("https://img.shelter.test/{}.jpg", id),
            name: format!("Dog {}", id),
            age: 3,
            zip_code: "98101".to_string(),
            breed: "Beagle".to_string(),
        }
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut selection = SelectionSet::new();

        assert!(selection.toggle(dog("d1")));
        assert!(selection.contains("d1"));
        assert_eq!(selection.len(), 1);

        assert!(!selection.toggle(dog("d1")));
        assert!(!selection.contains("d1"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_double_toggle_restores_membership() {
        let mut selection = SelectionSet::new();
        selection.toggle(dog("d1"));
        selection.toggle(dog("d2"));

        let before: Vec<String> = selection.ids();
        selection.toggle(dog("d3"));
        selection.toggle(dog("d3"));

        assert_eq!(selection.ids(), before);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut selection = SelectionSet::new();
        selection.toggle(dog("d2"));
        selection.toggle(dog("d1"));
        selection.toggle(dog("d3"));

        assert_eq!(selection.ids(), vec!["d2", "d1", "d3"]);
    }

    #[test]
    fn test_clear_empties_unconditionally() {
        let mut selection = SelectionSet::new();
        selection.toggle(dog("d1"));
        selection.toggle(dog("d2"));

        selection.clear();
        assert!(selection.is_empty());
        assert!(!selection.contains("d1"));
    }
}
