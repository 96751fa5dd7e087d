mod bounding_box;
mod overpass_config;
mod renderer_config;
mod trailmap_config;

pub use bounding_box::BoundingBox;
pub use overpass_config::OverpassConfig;
pub use renderer_config::RendererConfig;
pub use trailmap_config::TrailmapConfig;
