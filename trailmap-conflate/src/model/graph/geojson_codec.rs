//! conversion between the feature graph and the loom-style GeoJSON feature
//! collection exchanged with the network sources and the renderer.
use super::{
    EdgeSegment, Feature, FeatureGraph, Line, NodeDegree, NodeId, NodeState, NodeType, PointNode,
};
use crate::config::PriorityTable;
use crate::model::ConflationError;
use geo::{Coord, LineString};
use geojson::{FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};
use serde_json::json;
use std::str::FromStr;

impl TryFrom<&geojson::Feature> for Feature {
    type Error = ConflationError;

    fn try_from(feature: &geojson::Feature) -> Result<Self, Self::Error> {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| ConflationError::InvalidFeature(String::from("feature has no geometry")))?;
        let empty = JsonObject::new();
        let props = feature.properties.as_ref().unwrap_or(&empty);
        match &geometry.value {
            Value::Point(position) => decode_point(position, props).map(Feature::Point),
            Value::LineString(positions) => decode_edge(positions, props).map(Feature::Edge),
            other => Err(ConflationError::InvalidFeature(format!(
                "unsupported geometry type '{}'",
                other.type_name()
            ))),
        }
    }
}

fn decode_point(position: &[f64], props: &JsonObject) -> Result<PointNode, ConflationError> {
    let coord = decode_position(position)?;
    let id = props
        .get("id")
        .and_then(decode_node_id)
        .ok_or_else(|| ConflationError::InvalidFeature(String::from("point has no id")))?;
    let mut node = PointNode::new(id, coord);
    node.station_label = get_str(props, "station_label").unwrap_or_default();
    node.station_id = props
        .get("station_id")
        .and_then(decode_node_id)
        .filter(|s| !s.is_empty());
    node.node_type = get_str(props, "node_type").and_then(|s| NodeType::from_str(&s).ok());
    node.degree = NodeDegree {
        total: props.get("deg").and_then(decode_u32),
        incoming: props.get("deg_in").and_then(decode_u32),
        outgoing: props.get("deg_out").and_then(decode_u32),
    };
    node.osm_named = props.get("osm_named").map(decode_bool).unwrap_or_default();
    node.has_parking = props.get("has_parking").map(decode_bool).unwrap_or_default();
    node.state = props
        .get("state")
        .and_then(|v| serde_json::from_value::<NodeState>(v.clone()).ok())
        .unwrap_or_default();
    Ok(node)
}

fn decode_edge(positions: &[Vec<f64>], props: &JsonObject) -> Result<EdgeSegment, ConflationError> {
    if positions.len() < 2 {
        return Err(ConflationError::InvalidFeature(format!(
            "line string has {} coordinates, at least 2 required",
            positions.len()
        )));
    }
    let coords = positions
        .iter()
        .map(|p| decode_position(p))
        .collect::<Result<Vec<_>, _>>()?;
    let from = props.get("from").and_then(decode_node_id).unwrap_or_default();
    let to = props.get("to").and_then(decode_node_id).unwrap_or_default();
    let lines = match props.get("lines") {
        Some(value) => serde_json::from_value::<Vec<Line>>(value.clone())
            .map_err(|e| ConflationError::InvalidFeature(format!("invalid 'lines' property: {e}")))?,
        None => vec![],
    };
    Ok(EdgeSegment::new(from, to, LineString::from(coords), lines))
}

fn decode_position(position: &[f64]) -> Result<Coord<f64>, ConflationError> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(ConflationError::InvalidFeature(format!(
            "position has {} values, expected at least 2",
            position.len()
        ))),
    }
}

fn decode_node_id(value: &JsonValue) -> Option<NodeId> {
    match value {
        JsonValue::String(s) => Some(NodeId::from(s.as_str())),
        JsonValue::Number(n) => Some(NodeId::primary(n.to_string())),
        _ => None,
    }
}

fn get_str(props: &JsonObject, key: &str) -> Option<String> {
    props.get(key).and_then(|v| v.as_str()).map(String::from)
}

/// degree counters appear both as strings and as numbers in the wild
fn decode_u32(value: &JsonValue) -> Option<u32> {
    match value {
        JsonValue::String(s) => s.trim().parse().ok(),
        JsonValue::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}

fn decode_bool(value: &JsonValue) -> bool {
    match value {
        JsonValue::Bool(b) => *b,
        JsonValue::String(s) => matches!(s.trim(), "true" | "yes" | "1"),
        JsonValue::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    }
}

/// degree counters are written as strings. an absent counter is omitted.
fn insert_degree(props: &mut JsonObject, key: &str, value: Option<u32>) {
    if let Some(d) = value {
        props.insert(String::from(key), json!(d.to_string()));
    }
}

impl PointNode {
    /// writes this node as a GeoJSON point feature. the priority property is
    /// derived from the node type, never stored.
    pub fn to_geojson_feature(&self, priorities: &PriorityTable) -> geojson::Feature {
        let mut props = JsonObject::new();
        props.insert(String::from("id"), json!(self.id().to_string()));
        props.insert(
            String::from("station_id"),
            json!(self
                .station_id
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_default()),
        );
        props.insert(String::from("station_label"), json!(self.station_label));
        if let Some(node_type) = self.node_type {
            props.insert(String::from("node_type"), json!(node_type.to_string()));
            props.insert(String::from("priority"), json!(priorities.priority(node_type)));
        }
        insert_degree(&mut props, "deg", self.degree.total);
        insert_degree(&mut props, "deg_in", self.degree.incoming);
        insert_degree(&mut props, "deg_out", self.degree.outgoing);
        if self.osm_named {
            props.insert(String::from("osm_named"), json!(true));
        }
        if self.has_parking {
            props.insert(String::from("has_parking"), json!(true));
        }
        // the renderer ignores this key; it lets a written graph be read back
        if !self.state.is_active() {
            props.insert(String::from("state"), json!(self.state));
        }
        geojson::Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![self.coord.x, self.coord.y]))),
            id: None,
            properties: Some(props),
            foreign_members: None,
        }
    }
}

impl From<&EdgeSegment> for geojson::Feature {
    fn from(edge: &EdgeSegment) -> Self {
        let positions = edge.geometry.coords().map(|c| vec![c.x, c.y]).collect();
        let mut props = JsonObject::new();
        props.insert(String::from("from"), json!(edge.from.to_string()));
        props.insert(String::from("to"), json!(edge.to.to_string()));
        props.insert(String::from("lines"), json!(edge.lines));
        geojson::Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(positions))),
            id: None,
            properties: Some(props),
            foreign_members: None,
        }
    }
}

impl TryFrom<FeatureCollection> for FeatureGraph {
    type Error = ConflationError;

    /// decodes a feature collection. features that fail to decode are skipped
    /// with a warning; only a collection with no usable features fails.
    fn try_from(collection: FeatureCollection) -> Result<Self, Self::Error> {
        let total = collection.features.len();
        let mut features = Vec::with_capacity(total);
        for (idx, feature) in collection.features.iter().enumerate() {
            match Feature::try_from(feature) {
                Ok(f) => features.push(f),
                Err(e) => log::warn!("skipping feature {idx}: {e}"),
            }
        }
        let skipped = total - features.len();
        if skipped > 0 {
            log::warn!("skipped {skipped}/{total} malformed features");
        }
        if features.is_empty() && total > 0 {
            return Err(ConflationError::GeoJsonError(format!(
                "none of the {total} features could be decoded"
            )));
        }
        Ok(FeatureGraph::from_features(features))
    }
}

impl FeatureGraph {
    /// parses a serialized GeoJSON FeatureCollection
    pub fn from_geojson_str(s: &str) -> Result<FeatureGraph, ConflationError> {
        let geojson = s
            .parse::<GeoJson>()
            .map_err(|e| ConflationError::GeoJsonError(e.to_string()))?;
        let collection = FeatureCollection::try_from(geojson)
            .map_err(|e| ConflationError::GeoJsonError(e.to_string()))?;
        FeatureGraph::try_from(collection)
    }

    /// writes all points followed by all edges
    pub fn to_feature_collection(&self, priorities: &PriorityTable) -> FeatureCollection {
        let features = self
            .points()
            .iter()
            .map(|p| p.to_geojson_feature(priorities))
            .chain(self.edges().iter().map(geojson::Feature::from))
            .collect();
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    /// serializes to a single line of JSON, the form the renderer reads on stdin
    pub fn to_geojson_string(&self, priorities: &PriorityTable) -> Result<String, ConflationError> {
        let collection = self.to_feature_collection(priorities);
        let s = serde_json::to_string(&collection)?;
        Ok(s)
    }
}
