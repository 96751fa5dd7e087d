use thiserror::Error;
use trailmap_conflate::model::ConflationError;

#[derive(Error, Debug)]
pub enum TrailmapError {
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("failure during conflation: {source}")]
    ConflationError {
        #[from]
        source: ConflationError,
    },
    #[error("failure reading or writing a file: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
    #[error("failure decoding JSON: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
    #[error("failure querying overpass: {source}")]
    HttpError {
        #[from]
        source: reqwest::Error,
    },
    #[error("all overpass endpoints failed, last error: {0}")]
    OverpassUnavailable(String),
    #[error("offline mode requested but no cached trail graph exists at {0}")]
    MissingCache(String),
    #[error("failure running {binary}: {message}")]
    ExternalToolError { binary: String, message: String },
    #[error("failure rendering map: {0}")]
    RenderError(String),
}
