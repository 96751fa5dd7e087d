mod conflation_pipeline;
mod conflation_report;

pub use conflation_pipeline::{ConflationInputs, ConflationPipeline};
pub use conflation_report::ConflationReport;
