// Allow dead code: wire structs carry every field the API returns
#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A property listing as returned by the marketplace API.
///
/// The client treats this as an opaque record: it is displayed, counted and
/// cached, but no business values are derived from it beyond formatting.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Property {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "ownerId", default)]
    pub owner_id: Option<String>,
    #[serde(rename = "isOwnerListing", default)]
    pub is_owner_listing: bool,
    #[serde(rename = "isBrokerListing", default)]
    pub is_broker_listing: bool,
    #[serde(rename = "isAvailable", default)]
    pub is_available: bool,
    #[serde(rename = "isVegetarianPreferred", default)]
    pub is_vegetarian_preferred: bool,
    #[serde(rename = "isFamilyPreferred", default)]
    pub is_family_preferred: bool,
    #[serde(rename = "genderPreference", default)]
    pub gender_preference: Option<String>,
    #[serde(rename = "propertyType", default)]
    pub property_type: Option<String>,
    #[serde(rename = "listingType", default)]
    pub listing_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "societyName", default)]
    pub society_name: Option<String>,
    #[serde(rename = "streetAddress", default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(rename = "zipCode", default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub bedrooms: i32,
    #[serde(default)]
    pub bathrooms: i32,
    #[serde(rename = "areaSqft", default)]
    pub area_sqft: f64,
    #[serde(default)]
    pub balconies: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rent: f64,
    #[serde(rename = "securityDeposit", default)]
    pub security_deposit: f64,
    #[serde(rename = "maintenanceCharges", default)]
    pub maintenance_charges: f64,
    #[serde(rename = "leaseTerm", default)]
    pub lease_term: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(rename = "distancesFromOffices", default)]
    pub distances_from_offices: HashMap<String, f64>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub views: i64,
}

impl Property {
    /// One-line summary for list output, e.g.
    /// "Flat for Rent | Koramangala | 4 bd / 3 ba | 72000".
    pub fn summary(&self) -> String {
        let kind = match (self.property_type.as_deref(), self.listing_type.as_deref()) {
            (Some(p), Some(l)) => format!("{} for {}", p, l),
            (Some(p), None) => p.to_string(),
            (None, Some(l)) => format!("For {}", l),
            (None, None) => "Listing".to_string(),
        };
        format!(
            "{} | {} | {} bd / {} ba | {}",
            kind,
            self.location.as_deref().unwrap_or("unknown location"),
            self.bedrooms,
            self.bathrooms,
            self.rent,
        )
    }
}

/// Fields a user submits when posting a new listing. The server assigns the
/// id, audit timestamps and the view counter.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PropertyDraft {
    #[serde(rename = "propertyType")]
    pub property_type: String,
    #[serde(rename = "listingType")]
    pub listing_type: String,
    #[serde(rename = "genderPreference", skip_serializing_if = "Option::is_none")]
    pub gender_preference: Option<String>,
    pub location: String,
    #[serde(rename = "societyName", skip_serializing_if = "Option::is_none")]
    pub society_name: Option<String>,
    #[serde(rename = "streetAddress", skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub bedrooms: i32,
    pub bathrooms: i32,
    #[serde(rename = "areaSqft", default)]
    pub area_sqft: f64,
    pub rent: f64,
    #[serde(rename = "securityDeposit", default)]
    pub security_deposit: f64,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "isBrokerListing", default)]
    pub is_broker_listing: bool,
    #[serde(rename = "isVegetarianPreferred", default)]
    pub is_vegetarian_preferred: bool,
    #[serde(rename = "isFamilyPreferred", default)]
    pub is_family_preferred: bool,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_parses_camel_case_wire_names() {
        let json = r#"{
            "id": "665f1c2ab1",
            "propertyType": "Flat",
            "listingType": "Rent",
            "genderPreference": "Any",
            "location": "Koramangala",
            "rent": 72000,
            "bedrooms": 4,
            "bathrooms": 3,
            "areaSqft": 1450.5,
            "isBrokerListing": true,
            "photos": ["a.jpg", "b.jpg"],
            "views": 12
        }"#;

        let p: Property = serde_json::from_str(json).expect("parse property");
        assert_eq!(p.id, "665f1c2ab1");
        assert_eq!(p.property_type.as_deref(), Some("Flat"));
        assert_eq!(p.area_sqft, 1450.5);
        assert!(p.is_broker_listing);
        assert_eq!(p.photos.len(), 2);
        assert_eq!(p.views, 12);
    }

    #[test]
    fn property_tolerates_missing_fields() {
        let p: Property = serde_json::from_str(r#"{"id":"x"}"#).expect("parse minimal");
        assert_eq!(p.bedrooms, 0);
        assert!(p.location.is_none());
        assert!(!p.is_available);
    }

    #[test]
    fn summary_handles_partial_classification() {
        let p = Property {
            listing_type: Some("Rent".to_string()),
            location: Some("Whitefield".to_string()),
            bedrooms: 2,
            bathrooms: 1,
            rent: 30000.0,
            ..Default::default()
        };
        assert_eq!(p.summary(), "For Rent | Whitefield | 2 bd / 1 ba | 30000");
    }
}
