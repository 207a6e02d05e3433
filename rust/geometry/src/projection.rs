// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point-to-segment projection

use crate::point::Point2D;
use crate::DEGENERATE_LENGTH;

/// Result of projecting a point onto a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Distance from the segment start to the projected point, in `[0, length]`
    pub offset: f64,
    /// Distance from the input point to the projected point
    pub distance: f64,
    /// Closest point on the segment
    pub point: Point2D,
    /// Segment length
    pub length: f64,
}

/// Project `point` onto the segment `a -> b`, clamped to the segment.
///
/// Returns `None` when the segment is shorter than [`DEGENERATE_LENGTH`].
pub fn project_onto_segment(point: Point2D, a: Point2D, b: Point2D) -> Option<SegmentProjection> {
    let dir = a.vector_to(&b);
    let length = dir.norm();
    if length < DEGENERATE_LENGTH {
        return None;
    }

    let offset = (a.vector_to(&point).dot(&dir) / length).clamp(0.0, length);
    let on_segment = a.lerp(&b, offset / length);

    Some(SegmentProjection {
        offset,
        distance: point.distance_to(&on_segment),
        point: on_segment,
        length,
    })
}
