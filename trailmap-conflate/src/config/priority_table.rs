use crate::model::graph::NodeType;
use serde::{Deserialize, Serialize};

/// numeric rank of each node type. higher wins every tie-break.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityTable {
    pub rail_station: i32,
    pub named_trailhead: i32,
    pub synthetic_trailhead: i32,
    pub amenity_bearing: i32,
    pub unnamed_endpoint: i32,
    pub unnamed_interior: i32,
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self {
            rail_station: 100,
            named_trailhead: 50,
            synthetic_trailhead: 40,
            amenity_bearing: 30,
            unnamed_endpoint: 20,
            unnamed_interior: 10,
        }
    }
}

impl PriorityTable {
    pub fn priority(&self, node_type: NodeType) -> i32 {
        match node_type {
            NodeType::RailStation => self.rail_station,
            NodeType::NamedTrailhead => self.named_trailhead,
            NodeType::SyntheticTrailhead => self.synthetic_trailhead,
            NodeType::AmenityBearing => self.amenity_bearing,
            NodeType::UnnamedEndpoint => self.unnamed_endpoint,
            // absorbed nodes are invisible, they rank with the least informative nodes
            NodeType::UnnamedInterior | NodeType::Absorbed => self.unnamed_interior,
        }
    }

    /// confirms the table orders the types strictly from rail station down
    /// to unnamed interior
    pub fn is_monotonic(&self) -> bool {
        let ranks = [
            self.rail_station,
            self.named_trailhead,
            self.synthetic_trailhead,
            self.amenity_bearing,
            self.unnamed_endpoint,
            self.unnamed_interior,
        ];
        ranks.windows(2).all(|w| w[0] > w[1])
    }
}
