use crate::model::TrailmapError;
use std::path::{Path, PathBuf};
use trailmap_conflate::config::PriorityTable;
use trailmap_conflate::model::graph::FeatureGraph;

/// the unfiltered trail graph as last fetched, kept on disk for offline runs
pub struct TrailCache {
    path: PathBuf,
}

impl TrailCache {
    pub fn new(path: impl AsRef<Path>) -> TrailCache {
        TrailCache {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// reads the cached graph. a missing cache is fatal.
    pub fn load(&self) -> Result<FeatureGraph, TrailmapError> {
        if !self.exists() {
            return Err(TrailmapError::MissingCache(
                self.path.to_string_lossy().to_string(),
            ));
        }
        log::info!("loading cached trail graph from {}", self.path.display());
        let text = std::fs::read_to_string(&self.path)?;
        Ok(FeatureGraph::from_geojson_str(&text)?)
    }

    pub fn store(&self, graph: &FeatureGraph, priorities: &PriorityTable) -> Result<(), TrailmapError> {
        let text = graph.to_geojson_string(priorities)?;
        std::fs::write(&self.path, text)?;
        log::info!("cached trail graph to {}", self.path.display());
        Ok(())
    }
}
