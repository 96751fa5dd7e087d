mod bicycle_route;
mod route_color;
mod route_graph_builder;

pub use bicycle_route::BicycleRoute;
pub use route_color::{deterministic_color, route_color};
pub use route_graph_builder::{build_route_graph, RouteGraphSummary};
