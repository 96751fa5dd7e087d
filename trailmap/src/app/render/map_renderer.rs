use super::LabelPathFixup;
use crate::config::RendererConfig;
use crate::model::{ExternalTool, TrailmapError};

/// runs `loom | transitmap` over a serialized graph and post-processes the svg
pub struct MapRenderer {
    loom: ExternalTool,
    transitmap: ExternalTool,
    fixup: LabelPathFixup,
}

impl MapRenderer {
    pub fn new(config: &RendererConfig) -> Result<MapRenderer, TrailmapError> {
        Ok(MapRenderer {
            loom: ExternalTool::new(&config.loom_binary, &[]),
            transitmap: ExternalTool::new(&config.transitmap_binary, &config.transitmap_args()),
            fixup: LabelPathFixup::new(config.label_path_extension)?,
        })
    }

    pub fn required_tools(&self) -> Vec<ExternalTool> {
        vec![self.loom.clone(), self.transitmap.clone()]
    }

    /// renders newline-free GeoJSON text to svg. a transitmap failure is
    /// tolerated as long as it wrote something.
    pub fn render(&self, geojson: &str) -> Result<String, TrailmapError> {
        let bytes = self.loom.run_checked(Some(geojson.as_bytes().to_vec()))?;
        let output = self.transitmap.run(Some(bytes))?;
        if !output.success {
            if output.stdout.is_empty() {
                return Err(TrailmapError::RenderError(format!(
                    "{} exited with {} and produced no output",
                    self.transitmap.binary, output.status
                )));
            }
            log::warn!(
                "{} exited with {}, svg may be incomplete",
                self.transitmap.binary,
                output.status
            );
        }
        let svg = String::from_utf8(output.stdout)
            .map_err(|e| TrailmapError::RenderError(format!("svg output is not utf-8: {e}")))?;
        Ok(self.fix_label_paths(&svg))
    }

    pub fn fix_label_paths(&self, svg: &str) -> String {
        let (fixed, extended) = self.fixup.apply(svg);
        if extended > 0 {
            log::info!("extended {extended} station label paths to avoid clipped labels");
        }
        fixed
    }
}
