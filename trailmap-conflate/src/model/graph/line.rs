use serde::{Deserialize, Serialize};

/// membership of an edge in a route (a trail or a rail line)
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub color: String,
}

impl Line {
    pub fn new(id: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Line {
        Line {
            id: id.into(),
            label: label.into(),
            color: color.into(),
        }
    }
}
