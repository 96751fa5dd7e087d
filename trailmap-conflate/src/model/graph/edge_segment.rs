use super::{Line, NodeId};
use geo::{Coord, LineString};

/// a polyline between two point nodes, carrying its route memberships.
/// the first and last coordinates coincide with the endpoint nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSegment {
    pub from: NodeId,
    pub to: NodeId,
    pub geometry: LineString<f64>,
    pub lines: Vec<Line>,
}

impl EdgeSegment {
    pub fn new(from: NodeId, to: NodeId, geometry: LineString<f64>, lines: Vec<Line>) -> Self {
        EdgeSegment {
            from,
            to,
            geometry,
            lines,
        }
    }

    pub fn line_ids(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|l| l.id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn references(&self, node_id: &NodeId) -> bool {
        &self.from == node_id || &self.to == node_id
    }

    /// both endpoints name the same node. such an edge is left in place for
    /// the renderer to ignore.
    pub fn is_degenerate(&self) -> bool {
        self.from == self.to
    }

    /// re-points every endpoint referencing `old_id` to `new_id`, moving the
    /// matching polyline end onto `coord`. returns the number of endpoints changed.
    pub fn repoint(&mut self, old_id: &NodeId, new_id: &NodeId, coord: Coord<f64>) -> usize {
        let mut changed = 0;
        if &self.from == old_id {
            self.from = new_id.clone();
            if let Some(first) = self.geometry.0.first_mut() {
                *first = coord;
            }
            changed += 1;
        }
        if &self.to == old_id {
            self.to = new_id.clone();
            if let Some(last) = self.geometry.0.last_mut() {
                *last = coord;
            }
            changed += 1;
        }
        changed
    }
}
