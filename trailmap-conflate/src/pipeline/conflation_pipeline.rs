use super::ConflationReport;
use crate::algorithm::{
    amenity::annotate_amenities,
    classification::classify_graph,
    conflation::{absorb_secondary, merge_endpoints},
    enrichment::enrich_trailheads,
    labels::{deduplicate_labels, normalize_labels},
    pruning::prune_nodes,
};
use crate::config::ConflationConfig;
use crate::model::graph::FeatureGraph;
use crate::model::poi::PoiObservation;
use crate::model::ConflationError;

/// everything the engine consumes. optional inputs are None when their source
/// was disabled or unavailable, and the passes depending on them are skipped.
#[derive(Debug, Default)]
pub struct ConflationInputs {
    /// the trail network
    pub primary: FeatureGraph,
    /// the rail network
    pub secondary: Option<FeatureGraph>,
    pub trailheads: Option<Vec<PoiObservation>>,
    pub amenities: Option<Vec<PoiObservation>>,
}

/// runs the conflation passes in their required order over one graph
pub struct ConflationPipeline {
    config: ConflationConfig,
}

impl ConflationPipeline {
    pub fn new(config: ConflationConfig) -> Result<ConflationPipeline, ConflationError> {
        config.validate()?;
        Ok(ConflationPipeline { config })
    }

    pub fn config(&self) -> &ConflationConfig {
        &self.config
    }

    pub fn run(
        &self,
        inputs: ConflationInputs,
    ) -> Result<(FeatureGraph, ConflationReport), ConflationError> {
        let ConflationInputs {
            primary,
            secondary,
            trailheads,
            amenities,
        } = inputs;
        let config = &self.config;
        let mut report = ConflationReport::default();
        let mut graph = primary;

        log::info!("  (((1))) classifying primary nodes");
        report.classified = classify_graph(&mut graph);

        match secondary {
            Some(secondary) => {
                log::info!("  (((2))) absorbing secondary network stations");
                let (merged, summary) = absorb_secondary(graph, secondary, config)?;
                graph = merged;
                report.absorption = Some(summary);
            }
            None => log::info!("  (((2))) absorbing secondary network stations (skipped)"),
        }

        match trailheads {
            Some(observations) => {
                log::info!("  (((3))) enriching trailhead labels");
                report.trailheads = Some(enrich_trailheads(&mut graph, &observations, config)?);
            }
            None => log::info!("  (((3))) enriching trailhead labels (skipped)"),
        }

        log::info!("  (((4))) normalizing and de-duplicating labels");
        report.normalization = normalize_labels(&mut graph, config)?;
        report.deduplicated = deduplicate_labels(&mut graph, config);

        log::info!("  (((5))) merging trail endpoints");
        report.endpoint_merge = merge_endpoints(&mut graph, config)?;

        match amenities {
            Some(observations) => {
                log::info!("  (((6))) annotating amenities");
                report.amenities = Some(annotate_amenities(&mut graph, &observations, config));
            }
            None => log::info!("  (((6))) annotating amenities (skipped)"),
        }

        log::info!("  (((7))) pruning unnamed interior nodes");
        report.hidden = prune_nodes(&mut graph);

        report.points = graph.n_points();
        report.edges = graph.n_edges();
        report.dangling_references = graph.dangling_references();
        report.degenerate_edges = graph.degenerate_edges();
        if report.dangling_references > 0 {
            log::warn!(
                "{} edge endpoint(s) reference non-existent nodes",
                report.dangling_references
            );
        }
        Ok((graph, report))
    }
}
