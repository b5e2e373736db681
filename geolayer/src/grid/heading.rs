//! Heading-dependent slot visiting order.
//!
//! The 3×3 neighbourhood is fetched strictly sequentially, so the order
//! decides perceived latency: tiles in the direction of travel load first,
//! tiles behind load last. The compass is split into eight octants at
//! 22.5° boundaries, each with a fixed permutation of the row-major slot
//! indices
//!
//! ```text
//!   0 1 2
//!   3 4 5
//!   6 7 8
//! ```
//!
//! always starting at the centre slot 4.

/// Normalise a heading in degrees into `[0, 360)`.
pub fn normalize_heading(heading: f64) -> f64 {
    (heading % 360.0 + 360.0) % 360.0
}

/// Slot visiting permutation for a heading (degrees, any range).
pub fn visiting_order(heading: f64) -> [usize; 9] {
    let heading = normalize_heading(heading);
    if !(22.5..337.5).contains(&heading) {
        // Northbound
        [4, 1, 0, 2, 3, 5, 7, 6, 8]
    } else if heading < 67.5 {
        // Northeastbound
        [4, 2, 1, 5, 0, 8, 6, 3, 7]
    } else if heading < 112.5 {
        // Eastbound
        [4, 5, 2, 8, 1, 7, 3, 0, 6]
    } else if heading < 157.5 {
        // Southeastbound
        [4, 8, 5, 7, 2, 6, 0, 1, 3]
    } else if heading < 202.5 {
        // Southbound
        [4, 7, 8, 6, 5, 3, 1, 2, 0]
    } else if heading < 247.5 {
        // Southwestbound
        [4, 6, 7, 3, 8, 0, 2, 5, 1]
    } else if heading < 292.5 {
        // Westbound
        [4, 3, 6, 0, 7, 1, 5, 8, 2]
    } else {
        // Northwestbound
        [4, 0, 3, 1, 6, 2, 8, 7, 5]
    }
}
