use serde::{Deserialize, Serialize};

/// visibility of a point node. nodes are never removed from the graph; a node
/// that is not [`NodeState::Active`] is ignored by every pass and written out
/// with blank label/station fields so the renderer skips it, plus a `state`
/// property so the graph reads back with the same visibility.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    #[default]
    Active,
    /// soft-deleted by pruning or by an endpoint merge
    Hidden,
    /// replaced by a secondary-network station
    Absorbed,
}

impl NodeState {
    pub fn is_active(&self) -> bool {
        matches!(self, NodeState::Active)
    }
}
