use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// query extent in degrees, ordered (south, west, north, east) as overpass expects
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Default for BoundingBox {
    /// greater philadelphia
    fn default() -> Self {
        BoundingBox {
            south: 39.85,
            west: -75.65,
            north: 40.35,
            east: -74.85,
        }
    }
}

impl BoundingBox {
    pub fn validate(&self) -> Result<(), String> {
        let finite = [self.south, self.west, self.north, self.east]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(format!("bounding box has non-finite bounds: {self}"));
        }
        if self.south >= self.north || self.west >= self.east {
            return Err(format!("bounding box is empty or inverted: {self}"));
        }
        Ok(())
    }
}

impl Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.south, self.west, self.north, self.east)
    }
}
