//! SVG output for rendered tile grids.

use std::fmt::Write;

use crate::style::PathStyle;
use crate::tile::PathData;

use super::RenderTarget;

/// Collects drawn paths into an SVG fragment.
///
/// The document spans the full 3×3 neighbourhood, with the viewBox centred
/// on the middle tile so slot offsets land where the display expects them.
pub struct SvgDocument {
    tile_px: f64,
    body: String,
}

impl SvgDocument {
    /// Create an empty document for the given tile pixel size.
    pub fn new(tile_px: f64) -> Self {
        Self {
            tile_px,
            body: String::new(),
        }
    }

    /// Finish the document and return the SVG text.
    pub fn finish(self) -> String {
        let size = self.tile_px * 3.0;
        let origin = -self.tile_px;
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{origin} {origin} {size} {size}\">\n{}</svg>\n",
            self.body
        )
    }
}

impl RenderTarget for SvgDocument {
    fn draw_path(&mut self, order: u32, style: &PathStyle, path: &PathData, offset: (f64, f64)) {
        let mut css = String::new();
        if let Some(fill) = &style.fill {
            let _ = write!(css, "fill:{};", fill);
        } else {
            css.push_str("fill:none;");
        }
        if let Some(stroke) = &style.stroke {
            let _ = write!(css, "stroke:{};", stroke);
        }
        if let Some(width) = &style.stroke_width {
            let _ = write!(css, "stroke-width:{};", width);
        }

        let _ = writeln!(
            self.body,
            "  <path data-order=\"{order}\" style=\"{css}\" transform=\"translate({} {})\" d=\"{}\"/>",
            offset.0,
            offset.1,
            path.as_str()
        );
    }
}
