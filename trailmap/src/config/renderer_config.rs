use serde::{Deserialize, Serialize};

/// the loom | transitmap invocation and its svg post-processing
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub loom_binary: String,
    pub transitmap_binary: String,
    pub line_width: u32,
    pub line_spacing: u32,
    pub station_label_size: u32,
    pub line_label_size: u32,
    /// svg units appended to the end of every station label path
    pub label_path_extension: f64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        RendererConfig {
            loom_binary: String::from("./loom"),
            transitmap_binary: String::from("./transitmap"),
            line_width: 50,
            line_spacing: 25,
            station_label_size: 200,
            line_label_size: 160,
            label_path_extension: 20.0,
        }
    }
}

impl RendererConfig {
    pub fn transitmap_args(&self) -> Vec<String> {
        vec![
            String::from("-l"),
            format!("--line-width={}", self.line_width),
            format!("--line-spacing={}", self.line_spacing),
            format!("--station-label-textsize={}", self.station_label_size),
            format!("--line-label-textsize={}", self.line_label_size),
        ]
    }
}
