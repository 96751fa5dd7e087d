use crate::algorithm::spatial::{build_index, planar, SearchRadius};
use crate::config::ConflationConfig;
use crate::model::graph::{FeatureGraph, NodeType};
use crate::model::poi::{AmenityCategory, PoiObservation};
use itertools::Itertools;
use kdam::tqdm;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AmenitySummary {
    /// observations that placed an icon on a node
    pub snapped: usize,
    /// observations discarded by the minimum spacing rule
    pub spacing_blocked: usize,
    /// observations with no node in snapping range
    pub out_of_range: usize,
    /// nodes whose label received icons
    pub annotated: usize,
}

/// snaps amenity observations onto nearby nodes and appends their icons to the
/// node labels.
///
/// parking is handled after every other category so it can join a node that
/// already carries another icon. nodes flagged `has_parking` start out with a
/// parking icon. an observation is dropped when one of the same category was
/// already placed strictly within `amenity_min_spacing` of it.
pub fn annotate_amenities(
    graph: &mut FeatureGraph,
    observations: &[PoiObservation],
    config: &ConflationConfig,
) -> AmenitySummary {
    let categorized = observations
        .iter()
        .filter_map(|o| o.category().map(|c| (o, c)))
        .collect_vec();
    let ordered = categorized
        .iter()
        .filter(|(_, c)| *c != AmenityCategory::Parking)
        .chain(categorized.iter().filter(|(_, c)| *c == AmenityCategory::Parking))
        .collect_vec();

    let mut node_icons: BTreeMap<usize, BTreeSet<AmenityCategory>> = BTreeMap::new();
    for (idx, node) in graph.points().iter().enumerate() {
        if node.is_active() && node.has_parking {
            node_icons
                .entry(idx)
                .or_default()
                .insert(AmenityCategory::Parking);
        }
    }
    let mut node_amenity_name: HashMap<usize, String> = HashMap::new();
    let mut placed: HashMap<AmenityCategory, Vec<geo::Coord<f64>>> = HashMap::new();

    let index = build_index(
        config.spatial_index,
        graph.points().iter().map(|p| p.coord).collect(),
    );
    let mut summary = AmenitySummary::default();
    let iter = tqdm!(ordered.into_iter(), total = categorized.len(), desc = "snap amenities");
    for (observation, category) in iter {
        let blocked = placed.get(category).is_some_and(|coords| {
            coords
                .iter()
                .any(|c| planar::distance(observation.coord, *c) < config.amenity_min_spacing)
        });
        if blocked {
            summary.spacing_blocked += 1;
            continue;
        }

        let radius = SearchRadius::Inclusive(config.amenity_snap_dist(*category));
        let active = |i: usize| graph.point_at(i).is_some_and(|p| p.is_active());
        let mut nearest = index.nearest_within(observation.coord, radius, &active);
        if *category == AmenityCategory::Parking {
            // consolidate onto a dot that already shows another amenity
            let other_icons = |i: usize| {
                active(i)
                    && node_icons
                        .get(&i)
                        .is_some_and(|icons| icons.iter().any(|c| *c != AmenityCategory::Parking))
            };
            if let Some(hit) = index.nearest_within(observation.coord, radius, &other_icons) {
                nearest = Some(hit);
            }
        }
        let Some(hit) = nearest else {
            summary.out_of_range += 1;
            continue;
        };

        node_icons.entry(hit.index).or_default().insert(*category);
        placed.entry(*category).or_default().push(observation.coord);
        if let Some(name) = observation.name() {
            if !node_amenity_name.contains_key(&hit.index) || *category == AmenityCategory::Parking
            {
                node_amenity_name.insert(hit.index, String::from(name));
            }
        }
        summary.snapped += 1;
    }
    eprintln!();

    for (idx, icons) in node_icons.iter() {
        let Some(node) = graph.point_at_mut(*idx) else {
            continue;
        };
        let icon_text = config
            .icon_order
            .iter()
            .filter(|c| icons.contains(c))
            .map(|c| c.icon())
            .join(" ");
        if icon_text.is_empty() {
            continue;
        }
        let was_unlabeled = !node.is_labeled();
        let base = match node.label() {
            "" => node_amenity_name.get(idx).map(String::as_str).unwrap_or_default(),
            label => label,
        };
        let label = if base.is_empty() {
            icon_text
        } else {
            format!("{base} {icon_text}")
        };
        node.set_station_label(&label);
        // the icons are now what identifies an unnamed dot
        let unnamed = node.node_type.is_none_or(|t| t.is_unnamed());
        if !node.is_rail_station() && (was_unlabeled || unnamed) {
            node.node_type = Some(NodeType::AmenityBearing);
        }
        summary.annotated += 1;
    }

    let counts = placed
        .iter()
        .sorted_by_key(|(c, _)| **c)
        .map(|(c, v)| format!("{c}={}", v.len()))
        .join(", ");
    log::info!(
        "snapped {} amenity icons onto {} nodes ({counts})",
        summary.snapped,
        summary.annotated
    );
    summary
}
