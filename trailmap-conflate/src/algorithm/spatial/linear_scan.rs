use super::{
    planar::distance_squared,
    spatial_query::{closer, Neighbor, SpatialQuery},
    SearchRadius,
};
use geo::Coord;

/// brute force search, O(n) per query
pub struct LinearScan {
    coords: Vec<Coord<f64>>,
}

impl LinearScan {
    pub fn new(coords: Vec<Coord<f64>>) -> LinearScan {
        LinearScan { coords }
    }
}

impl SpatialQuery for LinearScan {
    fn len(&self) -> usize {
        self.coords.len()
    }

    fn nearest_within(
        &self,
        query: Coord<f64>,
        radius: SearchRadius,
        accept: &dyn Fn(usize) -> bool,
    ) -> Option<Neighbor> {
        let mut best: Option<(usize, f64)> = None;
        for (index, coord) in self.coords.iter().enumerate() {
            let d2 = distance_squared(query, *coord);
            if !radius.admits_squared(d2) || !accept(index) {
                continue;
            }
            match best {
                Some((_, best_d2)) if d2 >= best_d2 => {}
                _ => best = Some((index, d2)),
            }
        }
        best.map(|(index, d2)| Neighbor {
            index,
            distance: d2.sqrt(),
        })
    }

    fn within(&self, query: Coord<f64>, radius: SearchRadius) -> Vec<Neighbor> {
        let mut hits: Vec<Neighbor> = self
            .coords
            .iter()
            .enumerate()
            .filter_map(|(index, coord)| {
                let d2 = distance_squared(query, *coord);
                radius.admits_squared(d2).then(|| Neighbor {
                    index,
                    distance: d2.sqrt(),
                })
            })
            .collect();
        hits.sort_by(closer);
        hits
    }
}
