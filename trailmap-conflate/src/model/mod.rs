mod conflation_error;
pub mod graph;
pub mod poi;

pub use conflation_error::ConflationError;
