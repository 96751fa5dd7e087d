use serde::{Deserialize, Serialize};

/// degree counters as carried on a point feature. these are informational only:
/// passes that need the true degree recompute it from edge incidence.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDegree {
    pub total: Option<u32>,
    pub incoming: Option<u32>,
    pub outgoing: Option<u32>,
}

impl NodeDegree {
    /// the degree assumed for a node that carries no counter
    pub const DEFAULT_DEGREE: u32 = 2;

    pub fn new(total: u32, incoming: u32, outgoing: u32) -> NodeDegree {
        NodeDegree {
            total: Some(total),
            incoming: Some(incoming),
            outgoing: Some(outgoing),
        }
    }

    pub fn zero() -> NodeDegree {
        NodeDegree::new(0, 0, 0)
    }

    pub fn total_or_default(&self) -> u32 {
        self.total.unwrap_or(Self::DEFAULT_DEGREE)
    }
}
