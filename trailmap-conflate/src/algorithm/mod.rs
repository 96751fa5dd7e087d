pub mod amenity;
pub mod classification;
pub mod conflation;
pub mod enrichment;
pub mod labels;
pub mod pruning;
pub mod spatial;
