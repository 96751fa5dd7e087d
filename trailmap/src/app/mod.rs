mod map_build;
pub mod render;
mod route_filter;
mod trail_cache;

pub use map_build::{build_map, check_binaries, prepare_graph, render_map, MapBuildOptions};
pub use route_filter::filter_excluded_routes;
pub use trail_cache::TrailCache;
