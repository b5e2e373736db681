//! Path geometry as an SVG-style command buffer.

use std::fmt;
use std::fmt::Write;

/// Path geometry of one or more polylines/polygons.
///
/// Stored as the literal command string (`M x y `, `L x y `, trailing `Z`
/// for closed rings) so cached payloads round-trip byte-for-byte. Merging
/// two paths is concatenation; a following `M` starts a new subpath.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathData(String);

impl PathData {
    /// An empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-built command string (e.g. from a cache payload).
    pub fn from_raw(raw: String) -> Self {
        Self(raw)
    }

    /// Append a point: `M` for the first point of the buffer, `L` after.
    pub fn push_point(&mut self, x: f64, y: f64) {
        let command = if self.0.is_empty() { "M" } else { "L" };
        let _ = write!(self.0, "{command}{x} {y} ");
    }

    /// Close the current subpath.
    pub fn close(&mut self) {
        self.0.push('Z');
    }

    /// Append another path's commands (merge into one multi-path geometry).
    pub fn append(&mut self, other: &PathData) {
        self.0.push_str(&other.0);
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_raw(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
