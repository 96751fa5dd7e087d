use crate::algorithm::spatial::{
    planar::{project_onto, SegmentProjection},
    SearchRadius,
};
use crate::model::graph::{EdgeSegment, NodeId};
use crate::model::ConflationError;
use geo::{Coord, Euclidean, Length, LineString};

/// a location on an edge where a new node will be inserted
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSplit {
    pub edge_index: usize,
    pub projection: SegmentProjection,
}

impl EdgeSplit {
    /// finds the edge passing closest to `query` within `radius`. the first
    /// edge wins ties.
    pub fn nearest(
        edges: &[EdgeSegment],
        query: Coord<f64>,
        radius: SearchRadius,
    ) -> Option<EdgeSplit> {
        let mut best: Option<EdgeSplit> = None;
        for (edge_index, edge) in edges.iter().enumerate() {
            let Some(projection) = project_onto(&edge.geometry, query) else {
                continue;
            };
            if !radius.admits(projection.distance) {
                continue;
            }
            let better = match &best {
                Some(b) => projection.distance < b.projection.distance,
                None => true,
            };
            if better {
                best = Some(EdgeSplit {
                    edge_index,
                    projection,
                });
            }
        }
        best
    }

    pub fn coord(&self) -> Coord<f64> {
        self.projection.coord
    }

    /// cuts `edge` at the projected point into two edges meeting at `node_id`.
    /// both halves keep the line memberships of the original.
    pub fn apply(
        &self,
        edge: &EdgeSegment,
        node_id: &NodeId,
    ) -> Result<(EdgeSegment, EdgeSegment), ConflationError> {
        let coords = &edge.geometry.0;
        let si = self.projection.segment_index;
        if si + 1 >= coords.len() {
            return Err(ConflationError::EdgeSplitError(
                self.edge_index,
                format!(
                    "segment {si} out of range for line string with {} coordinates",
                    coords.len()
                ),
            ));
        }
        let q = self.projection.coord;
        let mut first_half = coords[..=si].to_vec();
        first_half.push(q);
        let mut second_half = vec![q];
        second_half.extend_from_slice(&coords[si + 1..]);
        let first = LineString::from(first_half);
        let second = LineString::from(second_half);
        for (name, half) in [("first", &first), ("second", &second)] {
            if half.0.len() < 2 || Euclidean.length(half) == 0.0 {
                return Err(ConflationError::EdgeSplitError(
                    self.edge_index,
                    format!("{name} half of the split has zero length"),
                ));
            }
        }
        let a = EdgeSegment::new(edge.from.clone(), node_id.clone(), first, edge.lines.clone());
        let b = EdgeSegment::new(node_id.clone(), edge.to.clone(), second, edge.lines.clone());
        Ok((a, b))
    }
}
