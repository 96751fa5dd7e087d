use crate::model::TrailmapError;
use regex::{Captures, NoExpand, Regex};

/// lengthens station label text paths in a transitmap svg.
///
/// transitmap sizes each label path from estimated font metrics, which can come
/// up short by part of a glyph so the last character gets clipped. every
/// `<path id="stlblp<n>" .../>` has its final segment extended along its own
/// direction by a fixed number of svg units.
pub struct LabelPathFixup {
    extension: f64,
    element_re: Regex,
    path_d_re: Regex,
    coord_re: Regex,
    last_coord_re: Regex,
}

impl LabelPathFixup {
    /// segments shorter than this have no usable direction
    const MIN_SEGMENT_LENGTH: f64 = 0.001;

    pub fn new(extension: f64) -> Result<LabelPathFixup, TrailmapError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                TrailmapError::RenderError(format!(
                    "internal error building label path regex '{pattern}': {e}"
                ))
            })
        };
        Ok(LabelPathFixup {
            extension,
            element_re: compile(r#"(?s)<path\b[^>]*\bid="stlblp\d+"[^>]*/>"#)?,
            path_d_re: compile(r#"\bd="([^"]+)""#)?,
            coord_re: compile(r"[ML]\s*([-\d.]+)\s+([-\d.]+)")?,
            last_coord_re: compile(r"([-\d.]+)\s+([-\d.]+)\s*$")?,
        })
    }

    /// rewrites the svg, returning it with the number of paths extended
    pub fn apply(&self, svg: &str) -> (String, usize) {
        let mut extended = 0;
        let fixed = self.element_re.replace_all(svg, |caps: &Captures| {
            match self.extend_element(&caps[0]) {
                Some(tag) => {
                    extended += 1;
                    tag
                }
                None => caps[0].to_string(),
            }
        });
        (fixed.into_owned(), extended)
    }

    fn extend_element(&self, tag: &str) -> Option<String> {
        let d_match = self.path_d_re.captures(tag)?;
        let d = d_match.get(1)?.as_str();
        let pts = self
            .coord_re
            .captures_iter(d)
            .map(|c| Some((c[1].parse::<f64>().ok()?, c[2].parse::<f64>().ok()?)))
            .collect::<Option<Vec<_>>>()?;
        if pts.len() < 2 {
            return None;
        }
        let (x0, y0) = pts[pts.len() - 2];
        let (x1, y1) = pts[pts.len() - 1];
        let (dx, dy) = (x1 - x0, y1 - y0);
        let seg = dx.hypot(dy);
        if seg < Self::MIN_SEGMENT_LENGTH {
            return None;
        }
        let nx = x1 + dx / seg * self.extension;
        let ny = y1 + dy / seg * self.extension;
        let replacement = format!("{nx:.1} {ny:.1}");
        let new_d = self.last_coord_re.replace(d, NoExpand(&replacement));
        Some(tag.replacen(&d_match[0], &format!("d=\"{new_d}\""), 1))
    }
}
