use crate::algorithm::spatial::{build_index, SearchRadius};
use crate::config::ConflationConfig;
use crate::model::ConflationError;
use crate::model::graph::{EdgeSegment, FeatureGraph, NodeDegree, NodeId, NodeType, PointNode};
use crate::model::poi::PoiObservation;
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashSet;
use super::EdgeSplit;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TrailheadSummary {
    /// existing nodes that received a trailhead name
    pub labeled: usize,
    /// synthetic nodes inserted by splitting an edge
    pub inserted: usize,
    /// observations that matched neither a node nor an edge
    pub unplaced: usize,
}

/// names graph nodes after nearby trailheads and trail parking lots.
///
/// pass 1 labels the nearest active node strictly within
/// `trailhead_match_dist` if it is still unlabeled. trailheads are handled
/// before parking lots so a lot never takes a trailhead's node. pass 2 takes
/// the observations no node was close enough for and, unless a rail station
/// already sits within `trailhead_insert_dist`, splits the nearest edge in that
/// range at the projected point with a new synthetic trailhead node.
pub fn enrich_trailheads(
    graph: &mut FeatureGraph,
    observations: &[PoiObservation],
    config: &ConflationConfig,
) -> Result<TrailheadSummary, ConflationError> {
    let ordered = observations
        .iter()
        .filter(|o| !o.is_parking())
        .chain(observations.iter().filter(|o| o.is_parking()))
        .filter(|o| o.name().is_some())
        .collect_vec();

    let index = build_index(
        config.spatial_index,
        graph.points().iter().map(|p| p.coord).collect(),
    );
    let match_radius = SearchRadius::Exclusive(config.trailhead_match_dist);
    let mut labeled = 0;
    let mut unmatched: Vec<&PoiObservation> = vec![];
    for observation in ordered {
        let name = observation.name().unwrap_or_default();
        let nearest = index.nearest_within(observation.coord, match_radius, &|i| {
            graph.point_at(i).is_some_and(|p| p.is_active())
        });
        let Some(node) = nearest.and_then(|hit| graph.point_at_mut(hit.index)) else {
            unmatched.push(observation);
            continue;
        };
        if observation.is_parking() {
            node.has_parking = true;
        }
        if node.is_rail_station() && node.is_labeled() {
            continue;
        }
        if !node.is_labeled() {
            log::debug!("labeling node {} as '{name}'", node.id());
            node.set_station_label(name);
            node.osm_named = true;
            if !node.is_rail_station() {
                node.node_type = Some(NodeType::NamedTrailhead);
            }
            labeled += 1;
        }
    }
    log::info!(
        "pass 1: labeled {labeled} existing nodes ({} unmatched)",
        unmatched.len()
    );

    // splits are planned against the edges as they were before this pass
    let insert_radius = SearchRadius::Exclusive(config.trailhead_insert_dist);
    let mut split_edges: HashSet<usize> = HashSet::new();
    let mut planned: Vec<(EdgeSplit, EdgeSegment, EdgeSegment, PointNode)> = vec![];
    let mut unplaced = 0;
    for observation in unmatched {
        let rail_nearby = index
            .nearest_within(observation.coord, insert_radius, &|i| {
                graph.point_at(i).is_some_and(|p| p.is_rail_station())
            })
            .is_some();
        if rail_nearby {
            continue;
        }
        let Some(split) = EdgeSplit::nearest(graph.edges(), observation.coord, insert_radius) else {
            unplaced += 1;
            continue;
        };
        if split_edges.contains(&split.edge_index) {
            continue;
        }
        let node_id = NodeId::synthetic(observation.id.as_str());
        if graph.contains_node(&node_id) || planned.iter().any(|(_, _, _, p)| p.id() == &node_id) {
            log::warn!("synthetic node {node_id} already exists, skipping trailhead");
            continue;
        }
        let edge = &graph.edges()[split.edge_index];
        let (first, second) = match split.apply(edge, &node_id) {
            Ok(halves) => halves,
            Err(e) => {
                log::warn!("{e}");
                continue;
            }
        };
        let mut node = PointNode::new_station(
            node_id,
            split.coord(),
            observation.name().unwrap_or_default(),
        );
        node.osm_named = true;
        node.node_type = Some(NodeType::SyntheticTrailhead);
        node.degree = NodeDegree::new(2, 1, 1);
        node.has_parking = observation.is_parking();
        split_edges.insert(split.edge_index);
        planned.push((split, first, second, node));
    }

    let mut inserted = 0;
    for (split, first, second, node) in planned {
        let Some(edge) = graph.edge_at_mut(split.edge_index) else {
            return Err(ConflationError::EdgeSplitError(
                split.edge_index,
                String::from("edge disappeared before the split was applied"),
            ));
        };
        *edge = first;
        graph.add_edge(second);
        graph.add_point(node)?;
        inserted += 1;
    }
    log::info!("pass 2: inserted {inserted} new trailhead stations on edges");
    log::info!("total labeled stations: {}", graph.labeled_count());

    Ok(TrailheadSummary {
        labeled,
        inserted,
        unplaced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::{Line, NodeState};
    use geo::{Coord, LineString};
    use std::collections::HashMap;

    fn obs(id: &str, name: &str, parking: bool, x: f64, y: f64) -> PoiObservation {
        let mut tags = HashMap::new();
        if !name.is_empty() {
            tags.insert(String::from("name"), String::from(name));
        }
        if parking {
            tags.insert(String::from("amenity"), String::from("parking"));
        } else {
            tags.insert(String::from("highway"), String::from("trailhead"));
        }
        PoiObservation::new(id, tags, Coord { x, y })
    }

    /// one long edge running east, with unlabeled nodes at its ends
    fn graph() -> FeatureGraph {
        let a = PointNode::new(NodeId::primary("1"), Coord { x: 0.0, y: 0.0 });
        let b = PointNode::new(NodeId::primary("2"), Coord { x: 0.125, y: 0.0 });
        let e = EdgeSegment::new(
            NodeId::primary("1"),
            NodeId::primary("2"),
            LineString::from(vec![(0.0, 0.0), (0.125, 0.0)]),
            vec![Line::new("pt", "Perkiomen Trail", "aa0000")],
        );
        FeatureGraph::new(vec![a, b], vec![e])
    }

    #[test]
    fn test_trailhead_before_parking() {
        let mut g = graph();
        let observations = vec![
            obs("100", "Lot 3 Trail Parking", true, 0.0005, 0.0),
            obs("101", "Betzwood", false, 0.001, 0.0),
        ];
        let summary = enrich_trailheads(&mut g, &observations, &ConflationConfig::default()).unwrap();
        assert_eq!(summary.labeled, 1);
        let node = g.get_point(&NodeId::primary("1")).unwrap();
        assert_eq!(node.label(), "Betzwood");
        assert!(node.osm_named);
        assert!(node.has_parking);
        assert_eq!(node.node_type, Some(NodeType::NamedTrailhead));
        assert_eq!(node.station_id, Some(NodeId::primary("1")));
    }

    #[test]
    fn test_unmatched_splits_edge_once() {
        let mut g = graph();
        let observations = vec![
            obs("200", "Oaks", false, 0.0625, 0.0005),
            obs("201", "Second Oaks", false, 0.075, 0.0005),
            obs("202", "", false, 0.08, 0.0),
            obs("203", "Far Away", false, 0.0625, 0.01),
        ];
        let summary = enrich_trailheads(&mut g, &observations, &ConflationConfig::default()).unwrap();
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.unplaced, 1);
        assert_eq!(g.n_edges(), 2);
        let th = NodeId::synthetic("200");
        let node = g.get_point(&th).unwrap();
        assert_eq!(node.node_type, Some(NodeType::SyntheticTrailhead));
        assert_eq!(node.coord, Coord { x: 0.0625, y: 0.0 });
        assert_eq!(node.degree, NodeDegree::new(2, 1, 1));
        assert_eq!(node.state, NodeState::Active);
        assert_eq!(g.edges()[0].to, th);
        assert_eq!(g.edges()[1].from, th);
        assert_eq!(g.edges()[1].to, NodeId::primary("2"));
        assert_eq!(g.dangling_references(), 0);
    }

    #[test]
    fn test_rail_station_blocks_insertion() {
        let mut g = graph();
        let mut station = PointNode::new(NodeId::secondary("R"), Coord { x: 0.0625, y: 0.0009 });
        station.node_type = Some(NodeType::RailStation);
        g.add_point(station).unwrap();
        let config = ConflationConfig {
            trailhead_match_dist: 0.0005,
            ..Default::default()
        };
        let observations = vec![obs("300", "Oaks", false, 0.0625, 0.0001)];
        let summary = enrich_trailheads(&mut g, &observations, &config).unwrap();
        assert_eq!(summary.labeled, 0);
        assert_eq!(summary.inserted, 0);
        assert_eq!(g.n_edges(), 1);
    }

    #[test]
    fn test_unlabeled_station_keeps_type() {
        let mut g = graph();
        let mut station = PointNode::new(NodeId::secondary("R"), Coord { x: 0.0625, y: 0.0009 });
        station.node_type = Some(NodeType::RailStation);
        g.add_point(station).unwrap();
        let observations = vec![obs("300", "Oaks", false, 0.0625, 0.0001)];
        let summary = enrich_trailheads(&mut g, &observations, &ConflationConfig::default()).unwrap();
        assert_eq!(summary.labeled, 1);
        let station = g.get_point(&NodeId::secondary("R")).unwrap();
        assert_eq!(station.label(), "Oaks");
        assert!(station.is_rail_station());
    }
}
