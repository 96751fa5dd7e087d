mod amenity_annotation;

pub use amenity_annotation::{annotate_amenities, AmenitySummary};
