//! spatial conflation: folding a secondary network's stations into the
//! primary graph, and merging trail termini into nearby stations.
mod endpoint_merge;
mod secondary_absorption;

pub use endpoint_merge::{merge_endpoints, EndpointMergeSummary};
pub use secondary_absorption::{absorb_secondary, AbsorptionSummary};
