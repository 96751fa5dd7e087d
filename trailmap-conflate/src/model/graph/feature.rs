use super::{EdgeSegment, PointNode};

/// one record of the feature collection. the graph keeps the two kinds in
/// separate vectors; this type is the boundary form used while decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Point(PointNode),
    Edge(EdgeSegment),
}
