use super::{
    planar::distance_squared,
    spatial_query::{closer, Neighbor, SpatialQuery},
    SearchRadius,
};
use geo::Coord;
use rstar::{primitives::GeomWithData, RTree};

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// bulk-loaded r-tree over the candidate coordinates
pub struct RTreeIndex {
    coords: Vec<Coord<f64>>,
    rtree: RTree<IndexedPoint>,
}

impl RTreeIndex {
    pub fn new(coords: Vec<Coord<f64>>) -> RTreeIndex {
        let entries = coords
            .iter()
            .enumerate()
            .map(|(index, c)| GeomWithData::new([c.x, c.y], index))
            .collect();
        let rtree = RTree::bulk_load(entries);
        RTreeIndex { coords, rtree }
    }

    /// every candidate within the radius. the r-tree query is inclusive on
    /// the boundary, so each hit is re-tested with the exact radius rule.
    fn candidates(&self, query: Coord<f64>, radius: SearchRadius) -> Vec<Neighbor> {
        let r = radius.radius();
        self.rtree
            .locate_within_distance([query.x, query.y], r * r)
            .filter_map(|entry| {
                let index = entry.data;
                let d2 = distance_squared(query, self.coords[index]);
                radius.admits_squared(d2).then(|| Neighbor {
                    index,
                    distance: d2.sqrt(),
                })
            })
            .collect()
    }
}

impl SpatialQuery for RTreeIndex {
    fn len(&self) -> usize {
        self.coords.len()
    }

    fn nearest_within(
        &self,
        query: Coord<f64>,
        radius: SearchRadius,
        accept: &dyn Fn(usize) -> bool,
    ) -> Option<Neighbor> {
        self.candidates(query, radius)
            .into_iter()
            .filter(|n| accept(n.index))
            .min_by(closer)
    }

    fn within(&self, query: Coord<f64>, radius: SearchRadius) -> Vec<Neighbor> {
        let mut hits = self.candidates(query, radius);
        hits.sort_by(closer);
        hits
    }
}
