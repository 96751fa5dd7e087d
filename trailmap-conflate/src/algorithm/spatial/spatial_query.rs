use super::SearchRadius;
use geo::Coord;

/// a hit from a spatial query: the candidate's position in the indexed list
/// and its (non-squared) planar distance to the query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

/// nearest-within-radius search over a fixed list of coordinates. the
/// conflation passes depend only on this interface, never on an index type.
pub trait SpatialQuery {
    /// number of indexed coordinates
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// the closest candidate within `radius` for which `accept` returns true.
    /// equally distant candidates resolve to the lowest index.
    fn nearest_within(
        &self,
        query: Coord<f64>,
        radius: SearchRadius,
        accept: &dyn Fn(usize) -> bool,
    ) -> Option<Neighbor>;

    /// all candidates within `radius`, sorted by distance then index
    fn within(&self, query: Coord<f64>, radius: SearchRadius) -> Vec<Neighbor>;
}

/// orders neighbors by distance, breaking ties by index
pub(crate) fn closer(a: &Neighbor, b: &Neighbor) -> std::cmp::Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}
