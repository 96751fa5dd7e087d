use super::{NodeDegree, NodeId, NodeState, NodeType};
use crate::config::PriorityTable;
use geo::{Coord, Point};

/// a point feature of the graph: a trail node, rail station, or synthetic trailhead.
///
/// the id is fixed at construction. every other attribute is mutated in place by
/// the conflation passes.
#[derive(Debug, Clone, PartialEq)]
pub struct PointNode {
    id: NodeId,
    pub coord: Coord<f64>,
    /// display text, empty when unlabeled
    pub station_label: String,
    /// set when the renderer should draw this node as a station
    pub station_id: Option<NodeId>,
    /// None until the node has been classified
    pub node_type: Option<NodeType>,
    pub degree: NodeDegree,
    /// the label came from an authoritative name tag rather than route membership
    pub osm_named: bool,
    pub has_parking: bool,
    pub state: NodeState,
}

impl PointNode {
    pub fn new(id: NodeId, coord: Coord<f64>) -> PointNode {
        PointNode {
            id,
            coord,
            station_label: String::new(),
            station_id: None,
            node_type: None,
            degree: NodeDegree::default(),
            osm_named: false,
            has_parking: false,
            state: NodeState::Active,
        }
    }

    /// creates a labeled station node whose station id is its own id
    pub fn new_station(id: NodeId, coord: Coord<f64>, label: &str) -> PointNode {
        let mut node = PointNode::new(id, coord);
        node.set_station_label(label);
        node
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// moves this node to a new id. only used when importing a foreign network.
    pub fn with_id(self, id: NodeId) -> PointNode {
        let station_id = self.station_id.as_ref().map(|_| id.clone());
        PointNode {
            id,
            station_id,
            ..self
        }
    }

    pub fn point(&self) -> Point<f64> {
        Point::from(self.coord)
    }

    pub fn label(&self) -> &str {
        self.station_label.trim()
    }

    pub fn is_labeled(&self) -> bool {
        !self.label().is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_rail_station(&self) -> bool {
        self.node_type == Some(NodeType::RailStation)
    }

    pub fn priority(&self, table: &PriorityTable) -> i32 {
        self.node_type.map(|t| table.priority(t)).unwrap_or_default()
    }

    /// assigns a label and makes this node a rendered station
    pub fn set_station_label(&mut self, label: &str) {
        self.station_label = String::from(label.trim());
        self.station_id = Some(self.id.clone());
    }

    /// removes the label and station marker but keeps the node visible
    /// as a plain (possibly endpoint) dot
    pub fn clear_label(&mut self) {
        self.station_label.clear();
        self.station_id = None;
    }

    /// soft-deletes this node. the node remains in the graph with blank label,
    /// station id and degree counters.
    pub fn hide(&mut self, state: NodeState) {
        self.clear_label();
        self.degree = NodeDegree::zero();
        self.state = state;
        if state == NodeState::Absorbed {
            self.node_type = Some(NodeType::Absorbed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hide_clears_sentinels() {
        let mut node = PointNode::new_station(NodeId::primary("1"), Coord { x: 0.0, y: 0.0 }, "Betzwood");
        node.degree = NodeDegree::new(1, 1, 1);
        node.node_type = Some(NodeType::NamedTrailhead);
        node.hide(NodeState::Absorbed);
        assert!(!node.is_labeled());
        assert_eq!(node.station_id, None);
        assert_eq!(node.degree, NodeDegree::zero());
        assert_eq!(node.node_type, Some(NodeType::Absorbed));
        assert!(!node.is_active());
    }

    #[test]
    fn test_with_id_moves_station_id() {
        let node = PointNode::new_station(NodeId::primary("9"), Coord { x: 0.0, y: 0.0 }, "Paoli");
        let moved = node.with_id(NodeId::secondary("9"));
        assert_eq!(moved.station_id, Some(NodeId::secondary("9")));
        let unlabeled = PointNode::new(NodeId::primary("8"), Coord { x: 0.0, y: 0.0 });
        assert_eq!(unlabeled.with_id(NodeId::secondary("8")).station_id, None);
    }
}
