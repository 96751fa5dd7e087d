mod rail_source;

pub use rail_source::RailSource;
