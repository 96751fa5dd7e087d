//! nearest-neighbor search over planar longitude/latitude coordinates.
//!
//! distances are euclidean in degrees, compared in squared form. this is an
//! approximation that holds at the regional scale of a single map.
mod linear_scan;
pub mod planar;
mod rtree_index;
mod search_radius;
mod spatial_query;

pub use linear_scan::LinearScan;
pub use rtree_index::RTreeIndex;
pub use search_radius::SearchRadius;
pub use spatial_query::{Neighbor, SpatialQuery};

use crate::config::SpatialIndexKind;
use geo::Coord;

/// builds the configured spatial query over a list of coordinates. query
/// results report positions in `coords`.
pub fn build_index(kind: SpatialIndexKind, coords: Vec<Coord<f64>>) -> Box<dyn SpatialQuery> {
    match kind {
        SpatialIndexKind::LinearScan => Box::new(LinearScan::new(coords)),
        SpatialIndexKind::RTree => Box::new(RTreeIndex::new(coords)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Coord<f64>> {
        let mut coords = vec![];
        for i in 0..10 {
            for j in 0..10 {
                coords.push(Coord {
                    x: -75.5 + i as f64 * 0.0007,
                    y: 40.1 + j as f64 * 0.0011,
                });
            }
        }
        // an exact duplicate so tie-breaking is exercised
        coords.push(coords[23]);
        coords
    }

    #[test]
    fn test_implementations_agree() {
        let coords = grid();
        let linear = build_index(SpatialIndexKind::LinearScan, coords.clone());
        let rtree = build_index(SpatialIndexKind::RTree, coords.clone());
        let queries = [
            Coord { x: -75.4985, y: 40.1022 },
            Coord { x: -75.5, y: 40.1 },
            coords[23],
            Coord { x: -75.6, y: 40.0 },
        ];
        let radii = [
            SearchRadius::Exclusive(0.001),
            SearchRadius::Inclusive(0.0011),
            SearchRadius::Exclusive(0.0),
            SearchRadius::Inclusive(0.0),
        ];
        for q in queries.iter() {
            for r in radii.iter() {
                let odd = |i: usize| i % 2 == 1;
                assert_eq!(
                    linear.nearest_within(*q, *r, &|_| true),
                    rtree.nearest_within(*q, *r, &|_| true),
                    "query {q:?} radius {r:?}"
                );
                assert_eq!(
                    linear.nearest_within(*q, *r, &odd),
                    rtree.nearest_within(*q, *r, &odd)
                );
                assert_eq!(linear.within(*q, *r), rtree.within(*q, *r));
            }
        }
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let coords = grid();
        let rtree = build_index(SpatialIndexKind::RTree, coords.clone());
        let hit = rtree
            .nearest_within(coords[23], SearchRadius::Inclusive(0.0), &|_| true)
            .unwrap();
        assert_eq!(hit.index, 23);
        assert_eq!(hit.distance, 0.0);
    }
}
