use crate::model::{ExternalTool, TrailmapError};
use serde::{Deserialize, Serialize};
use trailmap_conflate::model::graph::FeatureGraph;

/// where the rail network comes from. either form produces a feature
/// collection of stations and connecting segments in the loom schema.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RailSource {
    /// a GeoJSON file prepared ahead of time
    GeoJsonFile { path: String },
    /// a GTFS feed directory run through `gtfs2graph -m rail <dir> | topo`
    Gtfs {
        gtfs_directory: String,
        #[serde(default = "RailSource::default_gtfs2graph")]
        gtfs2graph_binary: String,
        #[serde(default = "RailSource::default_topo")]
        topo_binary: String,
    },
}

impl Default for RailSource {
    fn default() -> Self {
        RailSource::Gtfs {
            gtfs_directory: String::from("combined_rail_gtfs/"),
            gtfs2graph_binary: RailSource::default_gtfs2graph(),
            topo_binary: RailSource::default_topo(),
        }
    }
}

impl RailSource {
    fn default_gtfs2graph() -> String {
        String::from("./gtfs2graph")
    }

    fn default_topo() -> String {
        String::from("./topo")
    }

    /// programs that must be installed for this source to load
    pub fn required_tools(&self) -> Vec<ExternalTool> {
        match self {
            RailSource::GeoJsonFile { .. } => vec![],
            RailSource::Gtfs {
                gtfs_directory,
                gtfs2graph_binary,
                topo_binary,
            } => vec![
                ExternalTool::new(
                    gtfs2graph_binary,
                    &[String::from("-m"), String::from("rail"), gtfs_directory.clone()],
                ),
                ExternalTool::new(topo_binary, &[]),
            ],
        }
    }

    /// reads the rail network into a graph. node ids are kept as written by the
    /// source; namespacing happens when the graph is absorbed.
    pub fn load(&self) -> Result<FeatureGraph, TrailmapError> {
        let text = match self {
            RailSource::GeoJsonFile { path } => {
                log::info!("reading rail network from {path}");
                std::fs::read_to_string(path)?
            }
            RailSource::Gtfs { gtfs_directory, .. } => {
                log::info!("building rail network from GTFS feed at {gtfs_directory}");
                let mut bytes: Option<Vec<u8>> = None;
                for tool in self.required_tools() {
                    bytes = Some(tool.run_checked(bytes)?);
                }
                let bytes = bytes.unwrap_or_default();
                String::from_utf8(bytes).map_err(|e| TrailmapError::ExternalToolError {
                    binary: String::from("topo"),
                    message: format!("output is not utf-8: {e}"),
                })?
            }
        };
        let graph = FeatureGraph::from_geojson_str(&text)?;
        log::info!(
            "rail network has {} stations and {} segments",
            graph.n_points(),
            graph.n_edges()
        );
        Ok(graph)
    }
}
