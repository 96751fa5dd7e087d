mod filter_op;
mod filter_query;
mod overpass_client;
mod overpass_element;
mod overpass_query;

pub use filter_op::FilterOp;
pub use filter_query::FilterQuery;
pub use overpass_client::{ElementSource, OverpassClient};
pub use overpass_element::{ElementCenter, OverpassElement, OverpassResponse, RelationMember};
pub use overpass_query::{ElementKind, OutputMode, OverpassQuery, OverpassStatement};
