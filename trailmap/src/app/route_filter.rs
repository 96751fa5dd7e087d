use std::collections::BTreeSet;
use trailmap_conflate::model::graph::FeatureGraph;

/// drops lines whose label is excluded from every edge, then removes the edges
/// left without any line. returns the number of edges removed.
pub fn filter_excluded_routes(graph: &mut FeatureGraph, exclude: &BTreeSet<String>) -> usize {
    if exclude.is_empty() {
        return 0;
    }
    for edge in graph.edges_mut() {
        edge.lines.retain(|line| !exclude.contains(&line.label));
    }
    let before = graph.n_edges();
    graph.retain_edges(|edge| !edge.lines.is_empty());
    before - graph.n_edges()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, Coord};
    use trailmap_conflate::model::graph::{EdgeSegment, Line, NodeId, PointNode};

    #[test]
    fn test_filter_excluded_routes() {
        let points = vec![
            PointNode::new(NodeId::primary("a"), Coord { x: 0.0, y: 0.0 }),
            PointNode::new(NodeId::primary("b"), Coord { x: 1.0, y: 0.0 }),
            PointNode::new(NodeId::primary("c"), Coord { x: 2.0, y: 0.0 }),
        ];
        let shared = EdgeSegment::new(
            NodeId::primary("a"),
            NodeId::primary("b"),
            line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)],
            vec![
                Line::new("1", "BicyclePA Route E", "aa0000"),
                Line::new("2", "Schuylkill River Trail", "00aa00"),
            ],
        );
        let excluded_only = EdgeSegment::new(
            NodeId::primary("b"),
            NodeId::primary("c"),
            line_string![(x: 1.0, y: 0.0), (x: 2.0, y: 0.0)],
            vec![Line::new("1", "BicyclePA Route E", "aa0000")],
        );
        let mut graph = FeatureGraph::new(points, vec![shared, excluded_only]);
        let exclude = BTreeSet::from([String::from("BicyclePA Route E")]);

        let removed = filter_excluded_routes(&mut graph, &exclude);
        assert_eq!(removed, 1);
        assert_eq!(graph.n_edges(), 1);
        assert_eq!(graph.edges()[0].lines.len(), 1);
        assert_eq!(graph.edges()[0].lines[0].label, "Schuylkill River Trail");
        // points are untouched
        assert_eq!(graph.n_points(), 3);
    }
}
