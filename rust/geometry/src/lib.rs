// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roomplan Geometry Kernel
//!
//! Small, allocation-light 2D geometry for floor plans. Everything lives in
//! the floor plane: `x` runs across the plan, `z` runs along it (the `y`
//! axis is height and never appears here).
//!
//! All functions are pure. Degenerate input (zero-length segments or
//! axes) is rejected with `None` or skipped, never turned into `NaN`.

pub mod collision;
pub mod point;
pub mod polygon;
pub mod projection;
pub mod rect;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Rotation2, Vector2};

pub use collision::{polygons_intersect, project_onto_axis};
pub use point::Point2D;
pub use polygon::{
    extents, point_in_polygon, point_on_boundary, polygon_area, recenter, snap_to_grid, Extents,
    Polygon,
};
pub use projection::{project_onto_segment, SegmentProjection};
pub use rect::{rect_corners, Corners, OrientedRect};

/// Segments and axes shorter than this are treated as degenerate.
pub const DEGENERATE_LENGTH: f64 = 1e-9;
