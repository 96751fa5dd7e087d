mod label_path_fixup;
mod map_renderer;

pub use label_path_fixup::LabelPathFixup;
pub use map_renderer::MapRenderer;
