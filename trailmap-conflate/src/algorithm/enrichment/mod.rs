mod edge_split;
mod trailhead_enrichment;

pub use edge_split::EdgeSplit;
pub use trailhead_enrichment::{enrich_trailheads, TrailheadSummary};
