use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Property;

/// Property slice: independently replaceable collection slots plus the
/// shared loading/error flags. Identifiers are unique within a slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyState {
    pub properties: Vec<Property>,
    pub top_properties: Vec<Property>,
    pub popular_properties: Vec<Property>,
    pub searched_properties: Vec<Property>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum PropertyAction {
    SetLoading(bool),
    SetError(Option<String>),
    SetProperties(Vec<Property>),
    SetTopProperties(Vec<Property>),
    SetPopularProperties(Vec<Property>),
    SetSearchedProperties(Vec<Property>),
    /// Insert into the main slot; replaces an existing record with the same
    /// id so ids stay unique within the slot.
    AddProperty(Property),
    /// Replace the record with a matching id; no-op if absent.
    UpdateProperty(Property),
    /// Drop the record with this id; no-op if absent.
    RemoveProperty(String),
}

/// Pure reducer for the property slice.
pub fn reduce(state: &PropertyState, action: &PropertyAction) -> PropertyState {
    let mut next = state.clone();
    match action {
        PropertyAction::SetLoading(loading) => next.loading = *loading,
        PropertyAction::SetError(error) => next.error = error.clone(),
        PropertyAction::SetProperties(items) => next.properties = items.clone(),
        PropertyAction::SetTopProperties(items) => next.top_properties = items.clone(),
        PropertyAction::SetPopularProperties(items) => next.popular_properties = items.clone(),
        PropertyAction::SetSearchedProperties(items) => next.searched_properties = items.clone(),
        PropertyAction::AddProperty(property) => {
            match next.properties.iter_mut().find(|p| p.id == property.id) {
                Some(existing) => *existing = property.clone(),
                None => next.properties.push(property.clone()),
            }
        }
        PropertyAction::UpdateProperty(property) => {
            match next.properties.iter_mut().find(|p| p.id == property.id) {
                Some(existing) => *existing = property.clone(),
                None => debug!(id = %property.id, "Update for unknown property id, ignoring"),
            }
        }
        PropertyAction::RemoveProperty(id) => {
            next.properties.retain(|p| &p.id != id);
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str, rent: f64) -> Property {
        Property {
            id: id.to_string(),
            rent,
            ..Default::default()
        }
    }

    #[test]
    fn slots_are_independently_replaceable() {
        let s0 = PropertyState::default();
        let s1 = reduce(&s0, &PropertyAction::SetTopProperties(vec![listing("t1", 100.0)]));
        let s2 = reduce(&s1, &PropertyAction::SetSearchedProperties(vec![listing("s1", 200.0)]));

        assert_eq!(s2.top_properties.len(), 1);
        assert_eq!(s2.searched_properties.len(), 1);
        assert!(s2.properties.is_empty());
        assert!(s2.popular_properties.is_empty());
    }

    #[test]
    fn add_replaces_instead_of_duplicating() {
        let s0 = reduce(
            &PropertyState::default(),
            &PropertyAction::AddProperty(listing("p1", 100.0)),
        );
        let s1 = reduce(&s0, &PropertyAction::AddProperty(listing("p1", 150.0)));

        assert_eq!(s1.properties.len(), 1);
        assert_eq!(s1.properties[0].rent, 150.0);
    }

    #[test]
    fn update_matches_exact_id_or_does_nothing() {
        let s0 = reduce(
            &PropertyState::default(),
            &PropertyAction::SetProperties(vec![listing("p1", 100.0), listing("p2", 200.0)]),
        );

        let s1 = reduce(&s0, &PropertyAction::UpdateProperty(listing("p2", 250.0)));
        assert_eq!(s1.properties[1].rent, 250.0);

        let s2 = reduce(&s1, &PropertyAction::UpdateProperty(listing("missing", 1.0)));
        assert_eq!(s2.properties.len(), 2);
        assert_eq!(s2.properties[0].rent, 100.0);
    }

    #[test]
    fn remove_is_a_no_op_when_absent() {
        let s0 = reduce(
            &PropertyState::default(),
            &PropertyAction::SetProperties(vec![listing("p1", 100.0)]),
        );

        let s1 = reduce(&s0, &PropertyAction::RemoveProperty("p1".to_string()));
        assert!(s1.properties.is_empty());

        let s2 = reduce(&s1, &PropertyAction::RemoveProperty("p1".to_string()));
        assert!(s2.properties.is_empty());
    }

    #[test]
    fn error_and_loading_do_not_touch_collections() {
        let s0 = reduce(
            &PropertyState::default(),
            &PropertyAction::SetTopProperties(vec![listing("t1", 100.0)]),
        );
        let s1 = reduce(&s0, &PropertyAction::SetLoading(true));
        let s2 = reduce(&s1, &PropertyAction::SetError(Some("boom".to_string())));

        assert!(s2.loading);
        assert_eq!(s2.error.as_deref(), Some("boom"));
        assert_eq!(s2.top_properties.len(), 1);
    }
}
