use super::BicycleRoute;
use crate::model::overpass::{OverpassElement, OverpassQuery};
use crate::model::TrailmapError;
use geo::{Coord, LineString};
use itertools::Itertools;
use kdam::tqdm;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use trailmap_conflate::algorithm::spatial::{build_index, SearchRadius};
use trailmap_conflate::config::SpatialIndexKind;
use trailmap_conflate::model::graph::{
    EdgeSegment, FeatureGraph, NodeDegree, NodeId, PointNode,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteGraphSummary {
    pub routes: usize,
    /// trailhead-tagged nodes found on a route way
    pub trailheads_on_routes: usize,
    /// external trailheads snapped onto a route node
    pub snapped: usize,
    pub points: usize,
    pub edges: usize,
}

/// builds the trail network from an overpass response of bicycle route
/// relations with their member ways and nodes.
///
/// ways are split at trailhead nodes so trailheads become graph nodes. external
/// trailheads (from a separate point query) are snapped to the nearest route
/// node within `snap_dist` and split there too. an unnamed node at the end of a
/// route is labeled with the names of the routes that meet there.
pub fn build_route_graph(
    elements: &[OverpassElement],
    external_trailheads: Option<&[OverpassElement]>,
    snap_dist: f64,
    index_kind: SpatialIndexKind,
) -> Result<(FeatureGraph, RouteGraphSummary), TrailmapError> {
    if !(snap_dist.is_finite() && snap_dist >= 0.0) {
        return Err(TrailmapError::ConfigurationError(format!(
            "trailhead snap distance must be a non-negative number, found {snap_dist}"
        )));
    }
    let mut summary = RouteGraphSummary::default();

    let mut osm_nodes: HashMap<i64, Coord<f64>> = HashMap::new();
    let mut osm_ways: HashMap<i64, &[i64]> = HashMap::new();
    let mut node_names: HashMap<i64, String> = HashMap::new();
    let mut trailhead_nodes: BTreeSet<i64> = BTreeSet::new();
    let trailhead_filters = OverpassQuery::trailhead_filters();
    for element in elements.iter() {
        match element {
            OverpassElement::Node { id, lat, lon, tags } => {
                osm_nodes.insert(*id, Coord { x: *lon, y: *lat });
                if let Some(name) = tags.get("name").filter(|n| !n.trim().is_empty()) {
                    node_names.insert(*id, name.trim().to_string());
                }
                let is_trailhead = trailhead_filters
                    .iter()
                    .any(|group| group.iter().all(|f| f.filter(tags)));
                if is_trailhead {
                    trailhead_nodes.insert(*id);
                }
            }
            OverpassElement::Way { id, nodes, .. } => {
                osm_ways.insert(*id, nodes.as_slice());
            }
            OverpassElement::Relation { .. } => {}
        }
    }
    log::info!("found {} trailhead nodes in the response", trailhead_nodes.len());

    let routes = elements
        .iter()
        .filter(|e| e.tags().get("route").map(String::as_str) == Some("bicycle"))
        .filter_map(BicycleRoute::from_element)
        .collect_vec();
    summary.routes = routes.len();
    log::info!("found {} bicycle routes", routes.len());
    for route in routes.iter() {
        log::debug!("  - {} ({} ways)", route.name, route.way_refs.len());
    }

    let route_node_ids: BTreeSet<i64> = routes
        .iter()
        .flat_map(|r| r.way_refs.iter())
        .filter_map(|w| osm_ways.get(w))
        .flat_map(|nodes| nodes.iter().copied())
        .collect();
    let mut split_nodes: BTreeSet<i64> = trailhead_nodes
        .intersection(&route_node_ids)
        .copied()
        .collect();
    summary.trailheads_on_routes = split_nodes.len();

    if let Some(external) = external_trailheads {
        let route_nodes = route_node_ids
            .iter()
            .filter_map(|id| osm_nodes.get(id).map(|c| (*id, *c)))
            .collect_vec();
        let index = build_index(index_kind, route_nodes.iter().map(|(_, c)| *c).collect());
        let radius = SearchRadius::Exclusive(snap_dist);
        for element in external.iter() {
            if element.is_node() && split_nodes.contains(&element.id()) {
                continue;
            }
            let Some(coord) = element.coord() else {
                continue;
            };
            let Some(hit) = index.nearest_within(coord, radius, &|_| true) else {
                continue;
            };
            let (node_id, _) = route_nodes[hit.index];
            split_nodes.insert(node_id);
            let name = element.tags().get("name").map(|n| n.trim()).unwrap_or("");
            if !name.is_empty() && !node_names.contains_key(&node_id) {
                node_names.insert(node_id, name.to_string());
            }
            summary.snapped += 1;
        }
        log::info!(
            "snapped {} external trailheads to route nodes ({} split points)",
            summary.snapped,
            split_nodes.len()
        );
    }

    let mut edges: Vec<EdgeSegment> = vec![];
    let mut degree: BTreeMap<i64, u32> = BTreeMap::new();
    let mut node_routes: HashMap<i64, Vec<String>> = HashMap::new();
    let iter = tqdm!(routes.iter(), total = routes.len(), desc = "build route edges");
    for route in iter {
        let line = route.line();
        for way_id in route.way_refs.iter() {
            let Some(nodes) = osm_ways.get(way_id) else {
                continue;
            };
            let (valid_nodes, coords): (Vec<i64>, Vec<Coord<f64>>) = nodes
                .iter()
                .filter_map(|n| osm_nodes.get(n).map(|c| (*n, *c)))
                .unzip();
            if coords.len() < 2 {
                log::warn!("way {way_id} of route '{}' has fewer than 2 nodes, skipping", route.name);
                continue;
            }
            let last = valid_nodes.len() - 1;
            let split_idx = (0..=last)
                .filter(|i| *i == 0 || *i == last || split_nodes.contains(&valid_nodes[*i]))
                .collect_vec();
            for (s, e) in split_idx.iter().tuple_windows() {
                let (from, to) = (valid_nodes[*s], valid_nodes[*e]);
                for n in [from, to] {
                    *degree.entry(n).or_insert(0) += 1;
                    node_routes.entry(n).or_default().push(route.name.clone());
                }
                edges.push(EdgeSegment::new(
                    NodeId::primary(from.to_string()),
                    NodeId::primary(to.to_string()),
                    LineString::from(coords[*s..=*e].to_vec()),
                    vec![line.clone()],
                ));
            }
        }
    }
    eprintln!();

    let mut points: Vec<PointNode> = vec![];
    for (node_id, deg) in degree.iter() {
        let Some(coord) = osm_nodes.get(node_id) else {
            continue;
        };
        let id = NodeId::primary(node_id.to_string());
        let label = match node_names.get(node_id) {
            Some(name) => name.clone(),
            None if *deg == 1 => node_routes
                .get(node_id)
                .map(|names| names.iter().unique().join(" / "))
                .unwrap_or_default(),
            None => String::new(),
        };
        let mut point = if label.is_empty() {
            PointNode::new(id, *coord)
        } else {
            PointNode::new_station(id, *coord, &label)
        };
        point.degree = NodeDegree::new(*deg, *deg, *deg);
        points.push(point);
    }
    summary.points = points.len();
    summary.edges = edges.len();
    log::info!(
        "built route graph with {} nodes and {} edges",
        summary.points,
        summary.edges
    );
    Ok((FeatureGraph::new(points, edges), summary))
}
