use super::AmenityCategory;
use geo::Coord;
use std::collections::HashMap;

/// a point of interest as handed over by the primary network source:
/// an element id, its tags and a location (node position or area center).
#[derive(Debug, Clone, PartialEq)]
pub struct PoiObservation {
    pub id: String,
    pub tags: HashMap<String, String>,
    pub coord: Coord<f64>,
}

impl PoiObservation {
    pub fn new(id: impl Into<String>, tags: HashMap<String, String>, coord: Coord<f64>) -> Self {
        PoiObservation {
            id: id.into(),
            tags,
            coord,
        }
    }

    /// the trimmed `name` tag, if present and non-empty
    pub fn name(&self) -> Option<&str> {
        self.tags
            .get("name")
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
    }

    pub fn is_parking(&self) -> bool {
        self.tags.get("amenity").map(String::as_str) == Some("parking")
    }

    pub fn category(&self) -> Option<AmenityCategory> {
        AmenityCategory::from_tags(&self.tags)
    }
}
