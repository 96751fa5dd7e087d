use crate::config::PriorityTable;
use crate::model::graph::{FeatureGraph, NodeType, PointNode};

/// decides the type of a point node from its current properties. a node that
/// already has a type keeps it, so classification never downgrades an anchor.
pub fn classify(node: &PointNode) -> NodeType {
    if let Some(node_type) = node.node_type {
        return node_type;
    }
    let labeled = node.is_labeled();
    if labeled && node.osm_named {
        NodeType::NamedTrailhead
    } else if labeled && node.id().is_synthetic() {
        NodeType::SyntheticTrailhead
    } else if labeled {
        NodeType::NamedTrailhead
    } else if node.degree.total_or_default() == 1 {
        NodeType::UnnamedEndpoint
    } else {
        NodeType::UnnamedInterior
    }
}

/// type and priority of a node, the priority always taken from the table
pub fn classify_with_priority(node: &PointNode, priorities: &PriorityTable) -> (NodeType, i32) {
    let node_type = classify(node);
    (node_type, priorities.priority(node_type))
}

/// assigns a type to every point of the graph. returns the number of nodes
/// that were newly classified.
pub fn classify_graph(graph: &mut FeatureGraph) -> usize {
    let mut classified = 0;
    for node in graph.points_mut() {
        if node.node_type.is_none() {
            node.node_type = Some(classify(node));
            classified += 1;
        }
    }
    classified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::{NodeDegree, NodeId};
    use geo::Coord;

    fn node(id: NodeId, label: &str) -> PointNode {
        let mut n = PointNode::new(id, Coord { x: 0.0, y: 0.0 });
        if !label.is_empty() {
            n.set_station_label(label);
        }
        n
    }

    #[test]
    fn test_rule_order() {
        let mut osm = node(NodeId::synthetic("1"), "Valley Forge");
        osm.osm_named = true;
        assert_eq!(classify(&osm), NodeType::NamedTrailhead);

        let synthetic = node(NodeId::synthetic("2"), "Gulph Mills");
        assert_eq!(classify(&synthetic), NodeType::SyntheticTrailhead);

        let inferred = node(NodeId::primary("3"), "Perkiomen Trail");
        assert_eq!(classify(&inferred), NodeType::NamedTrailhead);

        let mut endpoint = node(NodeId::primary("4"), "");
        endpoint.degree = NodeDegree::new(1, 1, 1);
        assert_eq!(classify(&endpoint), NodeType::UnnamedEndpoint);

        // absent degree is treated as 2
        let interior = node(NodeId::primary("5"), "");
        assert_eq!(classify(&interior), NodeType::UnnamedInterior);
    }

    #[test]
    fn test_never_downgrades() {
        let mut rail = node(NodeId::secondary("9"), "");
        rail.node_type = Some(NodeType::RailStation);
        rail.degree = NodeDegree::new(1, 1, 1);
        let (t, p) = classify_with_priority(&rail, &PriorityTable::default());
        assert_eq!(t, NodeType::RailStation);
        assert_eq!(p, 100);
    }

    #[test]
    fn test_classify_graph_is_idempotent() {
        let mut graph = FeatureGraph::new(
            vec![node(NodeId::primary("1"), "A"), node(NodeId::primary("2"), "")],
            vec![],
        );
        assert_eq!(classify_graph(&mut graph), 2);
        assert_eq!(classify_graph(&mut graph), 0);
        let types: Vec<_> = graph.points().iter().map(|p| p.node_type).collect();
        assert_eq!(
            types,
            vec![Some(NodeType::NamedTrailhead), Some(NodeType::UnnamedInterior)]
        );
    }
}
