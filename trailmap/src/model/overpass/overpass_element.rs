use geo::Coord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use trailmap_conflate::model::poi::PoiObservation;

/// a center point reported by `out center;` for ways and relations
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementCenter {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationMember {
    #[serde(rename = "type")]
    pub member_type: String,
    #[serde(rename = "ref")]
    pub reference: i64,
    #[serde(default)]
    pub role: String,
}

/// one element of an overpass JSON response
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OverpassElement {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        tags: HashMap<String, String>,
        #[serde(default)]
        center: Option<ElementCenter>,
    },
    Relation {
        id: i64,
        #[serde(default)]
        members: Vec<RelationMember>,
        #[serde(default)]
        tags: HashMap<String, String>,
        #[serde(default)]
        center: Option<ElementCenter>,
    },
}

/// the body of an overpass JSON response
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

impl OverpassElement {
    pub fn id(&self) -> i64 {
        match self {
            OverpassElement::Node { id, .. } => *id,
            OverpassElement::Way { id, .. } => *id,
            OverpassElement::Relation { id, .. } => *id,
        }
    }

    pub fn tags(&self) -> &HashMap<String, String> {
        match self {
            OverpassElement::Node { tags, .. } => tags,
            OverpassElement::Way { tags, .. } => tags,
            OverpassElement::Relation { tags, .. } => tags,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, OverpassElement::Node { .. })
    }

    /// the node position, or the center of a way or relation if one was requested
    pub fn coord(&self) -> Option<Coord<f64>> {
        match self {
            OverpassElement::Node { lat, lon, .. } => Some(Coord { x: *lon, y: *lat }),
            OverpassElement::Way { center, .. } | OverpassElement::Relation { center, .. } => {
                center.map(|c| Coord { x: c.lon, y: c.lat })
            }
        }
    }

    /// reduces the element to the (id, tags, location) tuple the conflation
    /// engine consumes. elements without a location are dropped.
    pub fn to_observation(&self) -> Option<PoiObservation> {
        let coord = self.coord()?;
        Some(PoiObservation::new(
            self.id().to_string(),
            self.tags().clone(),
            coord,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_response() {
        let body = r#"{
            "version": 0.6,
            "elements": [
                {"type": "node", "id": 1, "lat": 40.0, "lon": -75.0,
                 "tags": {"highway": "trailhead", "name": "Valley Forge"}},
                {"type": "way", "id": 2, "nodes": [1, 3],
                 "center": {"lat": 40.1, "lon": -75.1},
                 "tags": {"amenity": "parking", "name": "Trail Lot"}},
                {"type": "relation", "id": 9,
                 "members": [{"type": "way", "ref": 2, "role": ""}],
                 "tags": {"route": "bicycle", "name": "Schuylkill River Trail"}}
            ]
        }"#;
        let response: OverpassResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.elements.len(), 3);
        let node = &response.elements[0];
        assert!(node.is_node());
        assert_eq!(node.coord(), Some(Coord { x: -75.0, y: 40.0 }));
        let way = response.elements[1].to_observation().unwrap();
        assert_eq!(way.id, "2");
        assert!(way.is_parking());
        assert_eq!(way.coord, Coord { x: -75.1, y: 40.1 });
        match &response.elements[2] {
            OverpassElement::Relation { members, .. } => {
                assert_eq!(members[0].member_type, "way");
                assert_eq!(members[0].reference, 2);
            }
            other => panic!("expected relation, found {other:?}"),
        }
        assert!(response.elements[2].to_observation().is_none());
    }
}
