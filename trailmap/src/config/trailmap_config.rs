use super::{BoundingBox, OverpassConfig, RendererConfig};
use crate::model::{rail::RailSource, TrailmapError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use trailmap_conflate::config::ConflationConfig;

/// defines a map build: what to fetch, how to conflate it and how to render it
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailmapConfig {
    pub bbox: BoundingBox,
    pub overpass: OverpassConfig,
    /// route names removed from the map before conflation
    pub exclude_routes: BTreeSet<String>,
    /// case-insensitive pattern for the names of trail access parking lots
    pub trail_parking_re: String,
    /// max distance (degrees) to snap an external trailhead onto a route node
    /// while building the trail graph
    pub trailhead_snap_dist: f64,
    pub rail: RailSource,
    pub renderer: RendererConfig,
    /// raw trail graph, reused by offline runs
    pub cache_file: String,
    /// conflated graph handed to the renderer
    pub filtered_file: String,
    pub output_svg: String,
    pub conflation: ConflationConfig,
}

impl Default for TrailmapConfig {
    fn default() -> Self {
        TrailmapConfig {
            bbox: BoundingBox::default(),
            overpass: OverpassConfig::default(),
            exclude_routes: BTreeSet::new(),
            trail_parking_re: String::from("trail|greenway"),
            trailhead_snap_dist: 0.001,
            rail: RailSource::default(),
            renderer: RendererConfig::default(),
            cache_file: String::from("circuit_trails.json"),
            filtered_file: String::from("circuit_trails_filtered.json"),
            output_svg: String::from("combined.svg"),
            conflation: ConflationConfig::default(),
        }
    }
}

impl TrailmapConfig {
    pub fn validate(&self) -> Result<(), TrailmapError> {
        self.bbox
            .validate()
            .map_err(TrailmapError::ConfigurationError)?;
        Regex::new(&self.trail_parking_re).map_err(|e| {
            TrailmapError::ConfigurationError(format!(
                "trail_parking_re '{}' is not a valid pattern: {e}",
                self.trail_parking_re
            ))
        })?;
        if !(self.trailhead_snap_dist.is_finite() && self.trailhead_snap_dist >= 0.0) {
            return Err(TrailmapError::ConfigurationError(format!(
                "trailhead_snap_dist must be a non-negative number, found {}",
                self.trailhead_snap_dist
            )));
        }
        if !self.renderer.label_path_extension.is_finite() {
            return Err(TrailmapError::ConfigurationError(String::from(
                "renderer.label_path_extension must be finite",
            )));
        }
        self.conflation.validate()?;
        Ok(())
    }
}

impl TryFrom<&String> for TrailmapConfig {
    type Error = TrailmapError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        let conf: TrailmapConfig = if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                TrailmapError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            toml::from_str(&s).map_err(|e| {
                TrailmapError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                TrailmapError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                TrailmapError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })?
        } else {
            return Err(TrailmapError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )));
        };
        conf.validate()?;
        Ok(conf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let conf = TrailmapConfig::default();
        assert!(conf.validate().is_ok());
        assert_eq!(conf.renderer.line_width, 50);
        assert_eq!(conf.conflation.endpoint_merge_dist, 0.006);
    }

    #[test]
    fn test_partial_toml() {
        let conf: TrailmapConfig = toml::from_str(
            r#"
            exclude_routes = ["BicyclePA Route E"]
            output_svg = "philly.svg"

            [bbox]
            south = 39.9
            west = -75.3
            north = 40.1
            east = -75.0

            [rail]
            type = "geo_json_file"
            path = "rail.json"

            [conflation]
            amenity_min_spacing = 0.003
            "#,
        )
        .unwrap();
        assert!(conf.exclude_routes.contains("BicyclePA Route E"));
        assert_eq!(conf.output_svg, "philly.svg");
        assert_eq!(conf.bbox.north, 40.1);
        assert_eq!(
            conf.rail,
            RailSource::GeoJsonFile {
                path: String::from("rail.json")
            }
        );
        assert_eq!(conf.conflation.amenity_min_spacing, 0.003);
        assert_eq!(conf.trail_parking_re, "trail|greenway");
        assert!(conf.validate().is_ok());
    }

    #[test]
    fn test_invalid_parking_pattern() {
        let conf = TrailmapConfig {
            trail_parking_re: String::from("trail(|greenway"),
            ..Default::default()
        };
        assert!(matches!(
            conf.validate(),
            Err(TrailmapError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = TrailmapConfig::try_from(&String::from("trailmap.yaml"));
        assert!(result.is_err());
    }
}
