//! Drawing-target abstraction for tile rendering.
//!
//! Tiles hold transport-agnostic path geometry; anything that can accept
//! draw-order-sorted styled paths with a pixel offset can display them.
//! The [`RenderTarget`] trait is that capability, with [`SvgDocument`] as
//! the built-in implementation.

mod svg;

pub use svg::SvgDocument;

use crate::style::PathStyle;
use crate::tile::PathData;

/// A surface that accepts styled paths in paint order.
///
/// Implementations receive paths in ascending draw order per tile; the
/// offset translates the tile into its slot position within the 3×3 grid.
pub trait RenderTarget {
    /// Draw one styled path.
    ///
    /// # Arguments
    ///
    /// * `order` - Paint order of the path (lower = underneath)
    /// * `style` - Stroke/fill style
    /// * `path` - SVG-style path commands in tile-local pixel space
    /// * `offset` - Pixel translation `(dx, dy)` for the tile's grid slot
    fn draw_path(&mut self, order: u32, style: &PathStyle, path: &PathData, offset: (f64, f64));
}
