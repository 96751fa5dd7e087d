use thiserror::Error;

use super::graph::NodeId;

#[derive(Error, Debug)]
pub enum ConflationError {
    #[error("invalid conflation configuration: {0}")]
    ConfigurationError(String),
    #[error("failure decoding GeoJSON document: {0}")]
    GeoJsonError(String),
    #[error("invalid feature: {0}")]
    InvalidFeature(String),
    #[error("node '{0}' occurs more than once in the feature graph")]
    DuplicateNodeId(NodeId),
    #[error("attempting to get node '{0}' not in graph")]
    GraphMissingNodeId(NodeId),
    #[error("failure splitting edge {0}: {1}")]
    EdgeSplitError(usize, String),
    #[error("failure building label pattern: {0}")]
    LabelPatternError(String),
    #[error("failure encoding JSON: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
    #[error("{0}")]
    InternalError(String),
}
