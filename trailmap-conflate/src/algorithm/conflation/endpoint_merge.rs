use crate::algorithm::spatial::{build_index, planar, SearchRadius};
use crate::config::ConflationConfig;
use crate::model::ConflationError;
use crate::model::graph::{FeatureGraph, NodeId, NodeLines, NodeState};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EndpointMergeSummary {
    /// degree-1 nodes merged into a station
    pub merged: usize,
    /// further nodes absorbed by walking out from merge targets
    pub cascaded: usize,
    /// edges left with identical endpoints
    pub degenerate: usize,
}

/// merges trail termini into nearby stations on other routes.
///
/// each degree-1 node that is not a rail station is merged into the nearest
/// active node within `endpoint_merge_dist` (inclusive) that is either a rail
/// station or labeled and sharing no line with the terminus. a cascade then
/// walks out from every merge target for up to `cascade_max_hops` hops,
/// absorbing labeled nodes in range that share none of the target's lines.
pub fn merge_endpoints(
    graph: &mut FeatureGraph,
    config: &ConflationConfig,
) -> Result<EndpointMergeSummary, ConflationError> {
    // line memberships and degree are taken before any re-pointing
    let node_lines = graph.node_lines();
    let endpoints = graph.endpoints();
    let index = build_index(
        config.spatial_index,
        graph.points().iter().map(|p| p.coord).collect(),
    );
    let radius = SearchRadius::Inclusive(config.endpoint_merge_dist);
    let no_lines = HashSet::new();

    let mut merged = 0;
    let mut merge_targets: Vec<NodeId> = vec![];
    for endpoint_id in endpoints.iter() {
        let endpoint = graph.get_point_data(endpoint_id)?;
        if endpoint.is_rail_station()
            || !endpoint.is_active()
            || merge_targets.contains(endpoint_id)
        {
            continue;
        }
        let endpoint_lines = node_lines.get(endpoint_id).unwrap_or(&no_lines);
        let accept = |i: usize| match graph.point_at(i) {
            Some(target) => {
                target.id() != endpoint_id
                    && target.is_active()
                    && (target.is_rail_station()
                        || (target.is_labeled()
                            && node_lines
                                .get(target.id())
                                .is_none_or(|lines| lines.is_disjoint(endpoint_lines))))
            }
            None => false,
        };
        let Some(hit) = index.nearest_within(endpoint.coord, radius, &accept) else {
            continue;
        };
        let target_id = graph
            .point_at(hit.index)
            .map(|t| t.id().clone())
            .ok_or_else(|| ConflationError::InternalError(format!("no point at {}", hit.index)))?;
        log::debug!(
            "merging endpoint {endpoint_id} into {target_id} at {:.6}",
            hit.distance
        );
        graph.repoint(endpoint_id, &target_id)?;
        graph.hide(endpoint_id, NodeState::Hidden);
        if !merge_targets.contains(&target_id) {
            merge_targets.push(target_id);
        }
        merged += 1;
    }

    let mut cascaded = 0;
    for target_id in merge_targets.iter() {
        cascaded += cascade(graph, target_id, &node_lines, config)?;
    }

    let degenerate = graph.degenerate_edges();
    if degenerate > 0 {
        log::warn!("{degenerate} degenerate edge(s) with identical endpoints remain in the graph");
    }
    log::info!("merged {merged} trail endpoints into transfer stations (+{cascaded} cascaded)");
    Ok(EndpointMergeSummary {
        merged,
        cascaded,
        degenerate,
    })
}

/// breadth-first walk out from a merge target, absorbing labeled neighbors
/// within range that belong to other routes than the target did originally.
/// the frontier only advances past absorbed nodes.
fn cascade(
    graph: &mut FeatureGraph,
    target_id: &NodeId,
    node_lines: &NodeLines,
    config: &ConflationConfig,
) -> Result<usize, ConflationError> {
    let target = graph.get_point_data(target_id)?;
    if !target.is_active() {
        return Ok(0);
    }
    let target_coord = target.coord;
    let no_lines = HashSet::new();
    let target_lines = node_lines.get(target_id).unwrap_or(&no_lines);
    let radius = SearchRadius::Inclusive(config.endpoint_merge_dist);

    let mut absorbed = 0;
    let mut visited: HashSet<NodeId> = HashSet::from([target_id.clone()]);
    let mut frontier: BTreeSet<NodeId> = graph
        .neighbors(target_id)
        .into_iter()
        .filter(|n| !visited.contains(n))
        .collect();
    for _ in 0..config.cascade_max_hops {
        if frontier.is_empty() {
            break;
        }
        let mut next_frontier = BTreeSet::new();
        for neighbor_id in frontier.iter() {
            visited.insert(neighbor_id.clone());
            let Some(neighbor) = graph.get_point(neighbor_id) else {
                continue;
            };
            if !neighbor.is_active() || neighbor.is_rail_station() || !neighbor.is_labeled() {
                continue;
            }
            let distance = planar::distance(target_coord, neighbor.coord);
            if !radius.admits(distance) {
                continue;
            }
            let shares_line = node_lines
                .get(neighbor_id)
                .is_some_and(|lines| !lines.is_disjoint(target_lines));
            if shares_line {
                continue;
            }
            log::debug!(
                "cascade: absorbing {neighbor_id} ({}) into {target_id} at {distance:.6}",
                neighbor.label()
            );
            graph.repoint(neighbor_id, target_id)?;
            graph.hide(neighbor_id, NodeState::Hidden);
            absorbed += 1;
            next_frontier.extend(
                graph
                    .neighbors(target_id)
                    .into_iter()
                    .filter(|n| !visited.contains(n)),
            );
        }
        frontier = next_frontier;
    }
    Ok(absorbed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::classification::classify_graph;
    use crate::model::graph::{EdgeSegment, Line, NodeType, PointNode};
    use geo::{Coord, LineString};

    fn pt(id: NodeId, x: f64, y: f64, label: &str) -> PointNode {
        let mut p = PointNode::new(id, Coord { x, y });
        if !label.is_empty() {
            p.set_station_label(label);
        }
        p
    }

    fn edge(points: &[PointNode], from: &NodeId, to: &NodeId, line: &str) -> EdgeSegment {
        let coord = |id: &NodeId| {
            points
                .iter()
                .find(|p| p.id() == id)
                .map(|p| p.coord)
                .unwrap_or_default()
        };
        EdgeSegment::new(
            from.clone(),
            to.clone(),
            LineString::from(vec![coord(from), coord(to)]),
            vec![Line::new(line, line, "000000")],
        )
    }

    /// the Schuylkill River Trail runs east-west through a labeled station.
    /// the Chester Valley Trail approaches from the south and ends just short
    /// of it, with a synthetic trailhead one hop before its terminus.
    fn fixture() -> FeatureGraph {
        let west = NodeId::primary("1");
        let station = NodeId::primary("2");
        let east = NodeId::primary("3");
        let south = NodeId::primary("10");
        let th = NodeId::synthetic("55");
        let terminus = NodeId::primary("11");
        let points = vec![
            pt(west.clone(), -0.01, 0.0, ""),
            pt(station.clone(), 0.0, 0.0, "Norristown"),
            pt(east.clone(), 0.01, 0.0, ""),
            pt(south.clone(), 0.0, -0.02, ""),
            pt(th.clone(), 0.0, -0.004, "Norristown Transit Center"),
            pt(terminus.clone(), 0.0, -0.003, ""),
        ];
        let edges = vec![
            edge(&points, &west, &station, "srt"),
            edge(&points, &station, &east, "srt"),
            edge(&points, &south, &th, "cvt"),
            edge(&points, &th, &terminus, "cvt"),
        ];
        FeatureGraph::new(points, edges)
    }

    #[test]
    fn test_merge_and_cascade() {
        let mut graph = fixture();
        classify_graph(&mut graph);
        let summary = merge_endpoints(&mut graph, &ConflationConfig::default()).unwrap();
        // terminus 11 merges into the station; the trailhead is then one hop
        // away, within range and on the other trail, so it cascades
        assert_eq!(summary.merged, 1);
        assert_eq!(summary.cascaded, 1);
        let station = NodeId::primary("2");
        let terminus = graph.get_point(&NodeId::primary("11")).unwrap();
        assert_eq!(terminus.state, NodeState::Hidden);
        let th = graph.get_point(&NodeId::synthetic("55")).unwrap();
        assert_eq!(th.state, NodeState::Hidden);
        assert!(!th.is_labeled());
        // the cvt edge now ends at the station, the former th-terminus edge is degenerate
        assert_eq!(graph.edges()[2].to, station);
        assert_eq!(graph.edges()[2].geometry.0[1], Coord { x: 0.0, y: 0.0 });
        assert_eq!(summary.degenerate, 1);
        assert_eq!(graph.dangling_references(), 0);
        // west and east are endpoints on the same line as the station, never merged
        assert!(graph.get_point(&NodeId::primary("1")).unwrap().is_active());
        assert!(graph.get_point(&NodeId::primary("3")).unwrap().is_active());
    }

    #[test]
    fn test_same_line_never_merges() {
        let a = NodeId::primary("1");
        let b = NodeId::primary("2");
        let c = NodeId::primary("3");
        let points = vec![
            pt(a.clone(), 0.0, 0.0, ""),
            pt(b.clone(), 0.001, 0.0, "Oaks"),
            pt(c.clone(), 0.002, 0.0, ""),
        ];
        let edges = vec![edge(&points, &a, &b, "pt"), edge(&points, &b, &c, "pt")];
        let mut graph = FeatureGraph::new(points, edges);
        let summary = merge_endpoints(&mut graph, &ConflationConfig::default()).unwrap();
        assert_eq!(summary.merged, 0);
    }

    #[test]
    fn test_rail_targets_ignore_shared_lines() {
        let a = NodeId::primary("1");
        let b = NodeId::primary("2");
        let rail = NodeId::secondary("R");
        let mut station = pt(rail.clone(), 0.005, 0.0, "");
        station.node_type = Some(NodeType::RailStation);
        let points = vec![
            pt(a.clone(), 0.0, 0.0, ""),
            pt(b.clone(), -0.01, 0.0, ""),
            station,
        ];
        let edges = vec![edge(&points, &b, &a, "x"), edge(&points, &b, &rail, "x")];
        let mut graph = FeatureGraph::new(points, edges);
        let summary = merge_endpoints(&mut graph, &ConflationConfig::default()).unwrap();
        // node 1 is an endpoint sharing line x with the unlabeled rail station,
        // still merged; the rail station is itself degree 1 but never merged away
        assert_eq!(summary.merged, 1);
        assert_eq!(graph.edges()[0].to, rail);
        assert!(graph.get_point(&rail).unwrap().is_active());
    }

    /// a rail station with no edges, and one trail whose free end sits beside
    /// it: F - D - C - B - A - E. E merges into the station, then the cascade
    /// walks back along the trail one node per hop.
    fn chain() -> FeatureGraph {
        let ids = ["E", "A", "B", "C", "D", "F"].map(NodeId::primary);
        let rail = NodeId::secondary("R");
        let mut station = pt(rail, 0.0, 0.0, "Conshohocken");
        station.node_type = Some(NodeType::RailStation);
        let mut points = vec![station];
        points.push(pt(ids[0].clone(), 0.0005, 0.0, ""));
        points.push(pt(ids[1].clone(), 0.001, 0.0, "Spring Mill"));
        points.push(pt(ids[2].clone(), 0.002, 0.0, "Miquon"));
        points.push(pt(ids[3].clone(), 0.003, 0.0, "Lafayette"));
        points.push(pt(ids[4].clone(), 0.004, 0.0, "Ivy Ridge"));
        points.push(pt(ids[5].clone(), 0.1, 0.0, ""));
        let edges = ids
            .windows(2)
            .map(|w| edge(&points, &w[1], &w[0], "srt"))
            .collect();
        FeatureGraph::new(points, edges)
    }

    fn is_active(graph: &FeatureGraph, id: &str) -> bool {
        graph.get_point(&NodeId::primary(id)).unwrap().is_active()
    }

    #[test]
    fn test_cascade_stops_after_max_hops() {
        let mut graph = chain();
        let config = ConflationConfig::default();
        assert_eq!(config.cascade_max_hops, 3);
        let summary = merge_endpoints(&mut graph, &config).unwrap();
        assert_eq!(summary.merged, 1);
        assert_eq!(summary.cascaded, 3);
        for hidden in ["E", "A", "B", "C"] {
            assert!(!is_active(&graph, hidden), "{hidden} should be hidden");
        }
        // D is four hops out and keeps its label
        assert!(is_active(&graph, "D"));
        assert_eq!(
            graph.get_point(&NodeId::primary("D")).unwrap().label(),
            "Ivy Ridge"
        );
        assert!(is_active(&graph, "F"));
        assert_eq!(graph.dangling_references(), 0);
    }

    #[test]
    fn test_cascade_single_hop() {
        let mut graph = chain();
        let config = ConflationConfig {
            cascade_max_hops: 1,
            ..Default::default()
        };
        let summary = merge_endpoints(&mut graph, &config).unwrap();
        assert_eq!(summary.merged, 1);
        assert_eq!(summary.cascaded, 1);
        assert!(!is_active(&graph, "A"));
        for active in ["B", "C", "D"] {
            assert!(is_active(&graph, active), "{active} should stay active");
        }
    }
}
