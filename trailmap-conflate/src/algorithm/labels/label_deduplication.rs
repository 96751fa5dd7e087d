use crate::algorithm::spatial::{build_index, SearchRadius};
use crate::config::{ConflationConfig, PriorityTable};
use crate::model::graph::{FeatureGraph, PointNode};
use itertools::Itertools;

/// decides which of two nodes sharing a label keeps it. returns true when `a`
/// wins: higher priority first, then an authoritative name, then the lower
/// incident degree. a full tie goes to `a`.
pub fn dedup_winner(
    a: &PointNode,
    a_degree: usize,
    b: &PointNode,
    b_degree: usize,
    priorities: &PriorityTable,
) -> bool {
    let (pa, pb) = (a.priority(priorities), b.priority(priorities));
    if pa != pb {
        return pa > pb;
    }
    if a.osm_named != b.osm_named {
        return a.osm_named;
    }
    a_degree <= b_degree
}

/// clears all but one of every group of equal labels (ignoring case) whose
/// nodes lie strictly within the deduplication radius of each other. returns
/// the number of labels cleared.
pub fn deduplicate_labels(graph: &mut FeatureGraph, config: &ConflationConfig) -> usize {
    let degree = graph.incidence_degree();
    let index = build_index(
        config.spatial_index,
        graph.points().iter().map(|p| p.coord).collect(),
    );
    let radius = SearchRadius::Exclusive(config.dedup_radius());
    let mut deduped = 0;
    for i in 0..graph.n_points() {
        let Some(node_i) = graph.point_at(i) else {
            continue;
        };
        if !node_i.is_active() || !node_i.is_labeled() {
            continue;
        }
        let candidates = index
            .within(node_i.coord, radius)
            .into_iter()
            .map(|n| n.index)
            .filter(|j| *j > i)
            .sorted()
            .collect_vec();
        for j in candidates {
            let (Some(a), Some(b)) = (graph.point_at(i), graph.point_at(j)) else {
                continue;
            };
            if !a.is_labeled() {
                break;
            }
            if !b.is_active() || !b.is_labeled() || a.label().to_lowercase() != b.label().to_lowercase()
            {
                continue;
            }
            let a_degree = degree.get(a.id()).copied().unwrap_or_default();
            let b_degree = degree.get(b.id()).copied().unwrap_or_default();
            let keep_a = dedup_winner(a, a_degree, b, b_degree, &config.priorities);
            let victim = if keep_a { j } else { i };
            if let Some(node) = graph.point_at_mut(victim) {
                log::debug!("clearing duplicate label '{}' on {}", node.label(), node.id());
                node.clear_label();
                deduped += 1;
            }
            if !keep_a {
                break;
            }
        }
    }
    if deduped > 0 {
        log::info!("de-duplicated {deduped} station labels");
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::classification::classify_graph;
    use crate::model::graph::{EdgeSegment, NodeId, NodeType};
    use geo::{Coord, LineString};

    fn labeled(id: NodeId, x: f64, label: &str) -> PointNode {
        PointNode::new_station(id, Coord { x, y: 0.0 }, label)
    }

    #[test]
    fn test_rail_station_keeps_label() {
        let mut rail = labeled(NodeId::secondary("N"), 0.003, "Norristown");
        rail.node_type = Some(NodeType::RailStation);
        let trailhead = labeled(NodeId::primary("1"), 0.0, "Norristown");
        let mut graph = FeatureGraph::new(vec![trailhead, rail], vec![]);
        classify_graph(&mut graph);
        assert_eq!(deduplicate_labels(&mut graph, &ConflationConfig::default()), 1);
        assert!(!graph.get_point(&NodeId::primary("1")).unwrap().is_labeled());
        assert_eq!(
            graph.get_point(&NodeId::secondary("N")).unwrap().label(),
            "Norristown"
        );
    }

    #[test]
    fn test_tie_breaks() {
        let mut named = labeled(NodeId::primary("1"), 0.0, "oaks");
        named.osm_named = true;
        named.node_type = Some(NodeType::NamedTrailhead);
        let mut inferred = labeled(NodeId::primary("2"), 0.001, "Oaks");
        inferred.node_type = Some(NodeType::NamedTrailhead);
        let table = PriorityTable::default();
        assert!(!dedup_winner(&inferred, 1, &named, 2, &table));
        assert!(dedup_winner(&named, 2, &inferred, 1, &table));

        inferred.osm_named = true;
        assert!(dedup_winner(&inferred, 1, &named, 2, &table));
        assert!(!dedup_winner(&named, 2, &inferred, 1, &table));
        // full tie keeps the first
        assert!(dedup_winner(&named, 1, &inferred, 1, &table));
    }

    #[test]
    fn test_convergence() {
        // three copies of one label in range: an interior node first, then two
        // endpoints. the interior node loses to the first endpoint, which then
        // beats the second.
        let points = vec![
            labeled(NodeId::primary("1"), 0.0, "Valley Forge"),
            labeled(NodeId::primary("2"), 0.001, "VALLEY FORGE"),
            labeled(NodeId::primary("3"), 0.002, "valley forge"),
            labeled(NodeId::primary("4"), 0.01, "Valley Forge"),
            PointNode::new(NodeId::primary("5"), Coord { x: 0.02, y: 0.0 }),
        ];
        let edge = |a: &str, b: &str| {
            EdgeSegment::new(
                NodeId::primary(a),
                NodeId::primary(b),
                LineString::from(vec![(0.0, 0.0), (0.0, 0.0)]),
                vec![],
            )
        };
        let edges = vec![edge("1", "2"), edge("1", "3"), edge("1", "5")];
        let mut graph = FeatureGraph::new(points, edges);
        classify_graph(&mut graph);
        let config = ConflationConfig::default();
        assert_eq!(deduplicate_labels(&mut graph, &config), 2);
        let kept = graph
            .points()
            .iter()
            .filter(|p| p.is_labeled())
            .map(|p| p.id().local.clone())
            .collect_vec();
        // node 4 is out of range of the others and keeps its label too
        assert_eq!(kept, vec!["2", "4"]);

        // no colliding pair remains
        let labeled = graph.points().iter().filter(|p| p.is_labeled()).collect_vec();
        for (a, b) in labeled.iter().tuple_combinations() {
            let close = (a.coord.x - b.coord.x).hypot(a.coord.y - b.coord.y) < config.dedup_radius();
            assert!(!(close && a.label().eq_ignore_ascii_case(b.label())));
        }
    }
}
