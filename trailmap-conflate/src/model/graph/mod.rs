mod edge_segment;
mod feature;
mod feature_graph;
mod geojson_codec;
mod line;
mod node_degree;
mod node_id;
mod node_state;
mod node_type;
mod point_node;

pub use edge_segment::EdgeSegment;
pub use feature::Feature;
pub use feature_graph::FeatureGraph;
pub use line::Line;
pub use node_degree::NodeDegree;
pub use node_id::{NodeId, NodeSource};
pub use node_state::NodeState;
pub use node_type::NodeType;
pub use point_node::PointNode;

use std::collections::{HashMap, HashSet};

/// route/line ids incident to each node, collected from edge memberships.
pub type NodeLines = HashMap<NodeId, HashSet<String>>;
