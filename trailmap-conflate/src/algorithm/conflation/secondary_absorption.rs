use crate::algorithm::spatial::{build_index, SearchRadius};
use crate::config::ConflationConfig;
use crate::model::ConflationError;
use crate::model::graph::{FeatureGraph, NodeId, NodeSource, NodeState, NodeType};
use itertools::Itertools;
use kdam::tqdm;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AbsorptionSummary {
    pub stations: usize,
    /// primary nodes replaced by a station
    pub absorbed: usize,
    /// edge endpoints moved onto a station
    pub repointed: usize,
    /// edge endpoints that name no point in the unified graph
    pub dangling: usize,
}

/// merges a secondary network into the primary graph.
///
/// secondary ids are moved into the secondary namespace and every secondary
/// point becomes a rail station. stations are visited in input order, each
/// claiming the nearest unclaimed primary node strictly within
/// `rail_station_merge_dist`. claimed nodes are hidden as absorbed and their
/// edges re-pointed onto the station. the result lists secondary points before
/// primary points and primary edges before secondary edges.
pub fn absorb_secondary(
    primary: FeatureGraph,
    secondary: FeatureGraph,
    config: &ConflationConfig,
) -> Result<(FeatureGraph, AbsorptionSummary), ConflationError> {
    let (secondary_points, secondary_edges) = secondary.into_parts();
    let stations = secondary_points
        .into_iter()
        .map(|p| {
            let id = p.id().into_namespace(NodeSource::Secondary);
            let mut station = p.with_id(id);
            station.node_type = Some(NodeType::RailStation);
            station
        })
        .collect_vec();
    let secondary_edges = secondary_edges
        .into_iter()
        .map(|mut e| {
            if !e.from.is_empty() {
                e.from = e.from.into_namespace(NodeSource::Secondary);
            }
            if !e.to.is_empty() {
                e.to = e.to.into_namespace(NodeSource::Secondary);
            }
            e
        })
        .collect_vec();
    log::info!(
        "secondary input: {} stations, {} edges",
        stations.len(),
        secondary_edges.len()
    );

    // greedy assignment in station order
    let (primary_points, primary_edges) = primary.into_parts();
    let index = build_index(
        config.spatial_index,
        primary_points.iter().map(|p| p.coord).collect(),
    );
    let radius = SearchRadius::Exclusive(config.rail_station_merge_dist);
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut remap: HashMap<NodeId, usize> = HashMap::new();
    let iter = tqdm!(
        stations.iter().enumerate(),
        total = stations.len(),
        desc = "absorb secondary stations"
    );
    for (station_idx, station) in iter {
        let nearest = index.nearest_within(station.coord, radius, &|i| !claimed.contains(&i));
        if let Some(hit) = nearest {
            let node = &primary_points[hit.index];
            log::debug!(
                "absorb primary node {} ({}) into {} ({}) at {:.6}",
                node.id(),
                node.label(),
                station.id(),
                station.label(),
                hit.distance
            );
            claimed.insert(hit.index);
            remap.insert(node.id().clone(), station_idx);
        }
    }
    eprintln!();

    let points = stations.into_iter().chain(primary_points).collect_vec();
    let edges = primary_edges.into_iter().chain(secondary_edges).collect_vec();
    let mut graph = FeatureGraph::new(points, edges);

    let mut repointed = 0;
    for (primary_id, station_idx) in remap.iter().sorted_by_key(|(_, idx)| **idx) {
        let station_id = graph
            .point_at(*station_idx)
            .map(|s| s.id().clone())
            .ok_or_else(|| {
                ConflationError::InternalError(format!("station index {station_idx} out of range"))
            })?;
        repointed += graph.repoint(primary_id, &station_id)?;
        graph.hide(primary_id, NodeState::Absorbed);
    }

    let dangling = graph.dangling_references();
    if dangling > 0 {
        log::warn!("{dangling} edge endpoint(s) reference non-existent nodes");
    }
    let summary = AbsorptionSummary {
        stations: graph
            .points()
            .iter()
            .filter(|p| p.is_rail_station())
            .count(),
        absorbed: remap.len(),
        repointed,
        dangling,
    };
    log::info!(
        "absorbed {} primary nodes into stations, re-pointed {} edge endpoints",
        summary.absorbed,
        summary.repointed
    );
    Ok((graph, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpatialIndexKind;
    use crate::model::graph::{EdgeSegment, Line, NodeDegree, PointNode};
    use geo::{Coord, LineString};

    fn pt(id: &str, x: f64, y: f64, label: &str) -> PointNode {
        let mut p = PointNode::new(NodeId::primary(id), Coord { x, y });
        if !label.is_empty() {
            p.set_station_label(label);
        }
        p
    }

    fn edge(from: &str, to: &str, coords: Vec<(f64, f64)>) -> EdgeSegment {
        EdgeSegment::new(
            NodeId::primary(from),
            NodeId::primary(to),
            LineString::from(coords),
            vec![Line::new("sr", "Schuylkill River Trail", "00aa00")],
        )
    }

    fn trail() -> FeatureGraph {
        let mut a = pt("1", 0.0, 0.0, "");
        a.degree = NodeDegree::new(1, 1, 1);
        let b = pt("2", 0.01, 0.0, "Norristown");
        let c = pt("3", 0.02, 0.0, "");
        FeatureGraph::new(
            vec![a, b, c],
            vec![
                edge("1", "2", vec![(0.0, 0.0), (0.005, 0.0), (0.01, 0.0)]),
                edge("2", "3", vec![(0.01, 0.0), (0.02, 0.0)]),
            ],
        )
    }

    fn rail(x: f64) -> FeatureGraph {
        let s = pt("90004", x, 0.0, "Norristown Transit Center");
        let t = pt("90005", x, 1.0, "Elm Street");
        let e = edge("90004", "90005", vec![(x, 0.0), (x, 1.0)]);
        FeatureGraph::new(vec![s, t], vec![e])
    }

    #[test]
    fn test_absorbs_node_within_threshold() {
        for kind in [SpatialIndexKind::LinearScan, SpatialIndexKind::RTree] {
            let config = ConflationConfig {
                spatial_index: kind,
                ..Default::default()
            };
            let (graph, summary) = absorb_secondary(trail(), rail(0.0115), &config).unwrap();
            assert_eq!(summary.absorbed, 1);
            assert_eq!(summary.repointed, 2);
            assert_eq!(summary.dangling, 0);

            let station_id = NodeId::secondary("90004");
            let station = graph.get_point(&station_id).unwrap();
            assert!(station.is_rail_station());
            assert_eq!(station.station_id, Some(station_id.clone()));

            let absorbed = graph.get_point(&NodeId::primary("2")).unwrap();
            assert_eq!(absorbed.state, NodeState::Absorbed);
            assert_eq!(absorbed.node_type, Some(NodeType::Absorbed));
            assert!(!absorbed.is_labeled());
            assert_eq!(absorbed.degree, NodeDegree::zero());

            let e0 = &graph.edges()[0];
            assert_eq!(e0.to, station_id);
            assert_eq!(e0.geometry.0.last(), Some(&Coord { x: 0.0115, y: 0.0 }));
            let e1 = &graph.edges()[1];
            assert_eq!(e1.from, station_id);
            assert_eq!(e1.geometry.0[0], Coord { x: 0.0115, y: 0.0 });
            // secondary edge renamespaced and appended last
            assert_eq!(graph.edges()[2].from, station_id);
            // secondary points first
            assert_eq!(graph.points()[0].id().source, NodeSource::Secondary);
            assert_eq!(graph.points()[1].id().source, NodeSource::Secondary);
        }
    }

    #[test]
    fn test_station_out_of_range() {
        let (graph, summary) =
            absorb_secondary(trail(), rail(0.0125), &ConflationConfig::default()).unwrap();
        assert_eq!(summary.absorbed, 0);
        assert!(graph.get_point(&NodeId::primary("2")).unwrap().is_active());
    }

    #[test]
    fn test_greedy_claims_in_station_order() {
        // both stations are nearest to node 2; the first claims it, the second
        // falls back to node 3 if within range or absorbs nothing
        let s1 = pt("A", 0.0101, 0.0, "First");
        let s2 = pt("B", 0.0099, 0.0, "Second");
        let secondary = FeatureGraph::new(vec![s1, s2], vec![]);
        let (graph, summary) =
            absorb_secondary(trail(), secondary, &ConflationConfig::default()).unwrap();
        assert_eq!(summary.absorbed, 1);
        assert_eq!(graph.edges()[0].to, NodeId::secondary("A"));
    }
}
