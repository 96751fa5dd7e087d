use serde::{Deserialize, Serialize};

/// which nearest-neighbor implementation backs the spatial queries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialIndexKind {
    /// brute force scan over every candidate
    LinearScan,
    #[default]
    RTree,
}
