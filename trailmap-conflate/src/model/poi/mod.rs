mod amenity_category;
mod poi_observation;

pub use amenity_category::AmenityCategory;
pub use poi_observation::PoiObservation;
