mod conflation_config;
mod priority_table;
mod spatial_index_kind;

pub use conflation_config::ConflationConfig;
pub use priority_table::PriorityTable;
pub use spatial_index_kind::SpatialIndexKind;
