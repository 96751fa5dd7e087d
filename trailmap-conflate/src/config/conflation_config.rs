use super::{PriorityTable, SpatialIndexKind};
use crate::model::{poi::AmenityCategory, ConflationError};
use serde::{Deserialize, Serialize};

/// thresholds and tables for the conflation passes. distances are planar
/// degrees of longitude/latitude.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ConflationConfig {
    /// radius for labeling a node from a trailhead observation. twice this
    /// value is the label deduplication radius.
    pub trailhead_match_dist: f64,
    /// radius for splitting an edge at an unmatched trailhead
    pub trailhead_insert_dist: f64,
    pub endpoint_merge_dist: f64,
    pub amenity_match_dist: f64,
    /// minimum spacing between two icons of the same category
    pub amenity_min_spacing: f64,
    pub rail_station_merge_dist: f64,
    pub cascade_max_hops: usize,
    /// labels are never shortened below this many characters
    pub label_min_chars: usize,
    /// route names shorter than this are never stripped from labels
    pub route_name_min_chars: usize,
    pub priorities: PriorityTable,
    pub icon_order: Vec<AmenityCategory>,
    pub spatial_index: SpatialIndexKind,
}

impl Default for ConflationConfig {
    fn default() -> Self {
        Self {
            trailhead_match_dist: 0.002,
            trailhead_insert_dist: 0.001,
            endpoint_merge_dist: 0.006,
            amenity_match_dist: 0.001,
            amenity_min_spacing: 0.002,
            rail_station_merge_dist: 0.002,
            cascade_max_hops: 3,
            label_min_chars: 3,
            route_name_min_chars: 5,
            priorities: PriorityTable::default(),
            icon_order: AmenityCategory::ALL.to_vec(),
            spatial_index: SpatialIndexKind::default(),
        }
    }
}

impl ConflationConfig {
    pub fn dedup_radius(&self) -> f64 {
        2.0 * self.trailhead_match_dist
    }

    /// snap radius for an amenity category. parking centroids sit farther from
    /// the path than the other amenities.
    pub fn amenity_snap_dist(&self, category: AmenityCategory) -> f64 {
        match category {
            AmenityCategory::Parking => self.trailhead_match_dist,
            _ => self.amenity_match_dist,
        }
    }

    /// rejects configurations that would make the passes meaningless
    pub fn validate(&self) -> Result<(), ConflationError> {
        let distances = [
            ("trailhead_match_dist", self.trailhead_match_dist),
            ("trailhead_insert_dist", self.trailhead_insert_dist),
            ("endpoint_merge_dist", self.endpoint_merge_dist),
            ("amenity_match_dist", self.amenity_match_dist),
            ("amenity_min_spacing", self.amenity_min_spacing),
            ("rail_station_merge_dist", self.rail_station_merge_dist),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(ConflationError::ConfigurationError(format!(
                    "{name} must be a non-negative number, found {value}"
                )));
            }
        }
        if !self.priorities.is_monotonic() {
            return Err(ConflationError::ConfigurationError(String::from(
                "priorities must strictly decrease from rail_station to unnamed_interior",
            )));
        }
        for category in AmenityCategory::ALL {
            if !self.icon_order.contains(&category) {
                return Err(ConflationError::ConfigurationError(format!(
                    "icon_order is missing category '{category}'"
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<&String> for ConflationConfig {
    type Error = ConflationError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let s = std::fs::read_to_string(f).map_err(|e| {
            ConflationError::ConfigurationError(format!("failure reading {f}: {e}"))
        })?;
        let config: ConflationConfig = if f.ends_with(".toml") {
            toml::from_str(&s).map_err(|e| {
                ConflationError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else if f.ends_with(".json") {
            serde_json::from_str(&s).map_err(|e| {
                ConflationError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else {
            return Err(ConflationError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )));
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml() {
        let config: ConflationConfig = toml::from_str(
            r#"
            endpoint_merge_dist = 0.004
            spatial_index = "linear_scan"

            [priorities]
            named_trailhead = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint_merge_dist, 0.004);
        assert_eq!(config.trailhead_match_dist, 0.002);
        assert_eq!(config.spatial_index, SpatialIndexKind::LinearScan);
        assert_eq!(config.priorities.named_trailhead, 60);
        assert_eq!(config.dedup_radius(), 0.004);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ConflationConfig {
            endpoint_merge_dist: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = ConflationConfig {
            icon_order: vec![AmenityCategory::Water],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
