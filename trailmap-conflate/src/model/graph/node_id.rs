use serde::{de::Visitor, Deserialize, Deserializer, Serialize};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// the network a node was sourced from. serialized ids carry the namespace as
/// a textual prefix so the renderer sees unique ids, but in memory the source is
/// kept as a separate tag and compared structurally.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NodeSource {
    /// the trail network, ids are OSM node ids
    #[default]
    Primary,
    /// the rail network, ids are GTFS-derived station ids
    Secondary,
    /// nodes created by splitting an edge at a projected trailhead
    Synthetic,
}

impl NodeSource {
    pub const SECONDARY_PREFIX: &'static str = "rail_";
    pub const SYNTHETIC_PREFIX: &'static str = "th_";

    pub fn prefix(&self) -> &'static str {
        match self {
            NodeSource::Primary => "",
            NodeSource::Secondary => Self::SECONDARY_PREFIX,
            NodeSource::Synthetic => Self::SYNTHETIC_PREFIX,
        }
    }
}

impl Display for NodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeSource::Primary => write!(f, "primary"),
            NodeSource::Secondary => write!(f, "secondary"),
            NodeSource::Synthetic => write!(f, "synthetic"),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub source: NodeSource,
    pub local: String,
}

impl NodeId {
    pub fn new(source: NodeSource, local: impl Into<String>) -> NodeId {
        NodeId {
            source,
            local: local.into(),
        }
    }

    pub fn primary(local: impl Into<String>) -> NodeId {
        NodeId::new(NodeSource::Primary, local)
    }

    pub fn secondary(local: impl Into<String>) -> NodeId {
        NodeId::new(NodeSource::Secondary, local)
    }

    pub fn synthetic(local: impl Into<String>) -> NodeId {
        NodeId::new(NodeSource::Synthetic, local)
    }

    /// re-homes this id in another source namespace. the full serialized form
    /// becomes the local part, so two ids that differ in any way before the move
    /// still differ after it.
    pub fn into_namespace(&self, source: NodeSource) -> NodeId {
        NodeId::new(source, self.to_string())
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == NodeSource::Synthetic
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source.prefix(), self.local)
    }
}

impl FromStr for NodeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(local) = s.strip_prefix(NodeSource::SECONDARY_PREFIX) {
            Ok(NodeId::secondary(local))
        } else if let Some(local) = s.strip_prefix(NodeSource::SYNTHETIC_PREFIX) {
            Ok(NodeId::synthetic(local))
        } else {
            Ok(NodeId::primary(s))
        }
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        // parsing is infallible, every string maps to some namespace
        NodeId::from_str(value).unwrap_or_else(|_| NodeId::primary(value))
    }
}

struct NodeIdVisitor;

impl Visitor<'_> for NodeIdVisitor {
    type Value = NodeId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a node id string or integer")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        NodeId::from_str(v).map_err(serde::de::Error::custom)
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(NodeId::primary(v.to_string()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(NodeId::primary(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<NodeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeIdVisitor)
    }
}

impl Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
