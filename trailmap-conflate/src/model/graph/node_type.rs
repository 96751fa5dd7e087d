use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// classification of a point node. the numeric priority of each type lives in
/// [`crate::config::PriorityTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    RailStation,
    NamedTrailhead,
    SyntheticTrailhead,
    AmenityBearing,
    UnnamedEndpoint,
    UnnamedInterior,
    Absorbed,
}

impl NodeType {
    pub fn is_unnamed(&self) -> bool {
        matches!(self, NodeType::UnnamedEndpoint | NodeType::UnnamedInterior)
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeType::RailStation => "rail_station",
            NodeType::NamedTrailhead => "named_trailhead",
            NodeType::SyntheticTrailhead => "synthetic_trailhead",
            NodeType::AmenityBearing => "amenity_bearing",
            NodeType::UnnamedEndpoint => "unnamed_endpoint",
            NodeType::UnnamedInterior => "unnamed_interior",
            NodeType::Absorbed => "absorbed",
        };
        write!(f, "{s}")
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "rail_station" => Ok(NodeType::RailStation),
            "named_trailhead" => Ok(NodeType::NamedTrailhead),
            "synthetic_trailhead" => Ok(NodeType::SyntheticTrailhead),
            "amenity_bearing" => Ok(NodeType::AmenityBearing),
            "unnamed_endpoint" => Ok(NodeType::UnnamedEndpoint),
            "unnamed_interior" => Ok(NodeType::UnnamedInterior),
            "absorbed" => Ok(NodeType::Absorbed),
            other => Err(format!("unknown node type '{other}'")),
        }
    }
}
