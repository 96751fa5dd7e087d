mod external_tool;
pub mod osm;
pub mod overpass;
pub mod rail;
mod trailmap_error;

pub use external_tool::{ExternalTool, ToolOutput};
pub use trailmap_error::TrailmapError;
