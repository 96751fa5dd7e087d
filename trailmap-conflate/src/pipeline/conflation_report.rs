use crate::algorithm::{
    amenity::AmenitySummary,
    conflation::{AbsorptionSummary, EndpointMergeSummary},
    enrichment::TrailheadSummary,
    labels::NormalizationSummary,
};
use serde::Serialize;
use std::fmt::Display;

/// counts collected while running the conflation passes. a pass that was
/// skipped for lack of input leaves its entry empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConflationReport {
    pub classified: usize,
    pub absorption: Option<AbsorptionSummary>,
    pub trailheads: Option<TrailheadSummary>,
    pub normalization: NormalizationSummary,
    pub deduplicated: usize,
    pub endpoint_merge: EndpointMergeSummary,
    pub amenities: Option<AmenitySummary>,
    pub hidden: usize,
    pub points: usize,
    pub edges: usize,
    /// edge endpoints naming no point in the final graph
    pub dangling_references: usize,
    pub degenerate_edges: usize,
}

impl Display for ConflationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "points: {}, edges: {}", self.points, self.edges)?;
        writeln!(f, "classified: {}", self.classified)?;
        if let Some(a) = &self.absorption {
            writeln!(
                f,
                "rail: {} stations, absorbed {}, re-pointed {}",
                a.stations, a.absorbed, a.repointed
            )?;
        }
        if let Some(t) = &self.trailheads {
            writeln!(
                f,
                "trailheads: labeled {}, inserted {}, unplaced {}",
                t.labeled, t.inserted, t.unplaced
            )?;
        }
        writeln!(
            f,
            "labels: normalized {}, cleared {}, de-duplicated {}",
            self.normalization.normalized, self.normalization.cleared, self.deduplicated
        )?;
        writeln!(
            f,
            "endpoints: merged {}, cascaded {}",
            self.endpoint_merge.merged, self.endpoint_merge.cascaded
        )?;
        if let Some(a) = &self.amenities {
            writeln!(
                f,
                "amenities: snapped {} onto {} nodes, {} too close, {} out of range",
                a.snapped, a.annotated, a.spacing_blocked, a.out_of_range
            )?;
        }
        writeln!(f, "hidden: {}", self.hidden)?;
        write!(
            f,
            "dangling references: {}, degenerate edges: {}",
            self.dangling_references, self.degenerate_edges
        )
    }
}
