// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Oriented rectangles (footprints and wall colliders)

use crate::point::Point2D;
use crate::DEGENERATE_LENGTH;
use nalgebra::{Rotation2, Vector2};

/// Four corners of a rectangle, ordered around its boundary.
pub type Corners = [Point2D; 4];

/// Local corner signs, walked around the boundary.
const SIGNS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Corners of a `width` x `depth` rectangle centered on `center` and
/// rotated by `rotation_deg`. At rotation 0 the width runs along `x`.
pub fn rect_corners(center: Point2D, width: f64, depth: f64, rotation_deg: f64) -> Corners {
    let rotation = Rotation2::new(rotation_deg.to_radians());
    let half_w = width / 2.0;
    let half_d = depth / 2.0;

    SIGNS.map(|(sx, sz)| center.offset_by(&(rotation * Vector2::new(sx * half_w, sz * half_d))))
}

/// A rectangle with an arbitrary orientation in the floor plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedRect {
    pub center: Point2D,
    /// Extent along the local x axis
    pub width: f64,
    /// Extent along the local z axis
    pub depth: f64,
    /// Rotation in degrees
    pub rotation_deg: f64,
}

impl OrientedRect {
    pub fn new(center: Point2D, width: f64, depth: f64, rotation_deg: f64) -> Self {
        Self {
            center,
            width,
            depth,
            rotation_deg,
        }
    }

    /// Rectangle running along the segment `a -> b`, `depth` thick and
    /// centered on the segment. Returns `None` for a zero-length segment.
    pub fn along_segment(a: Point2D, b: Point2D, depth: f64) -> Option<Self> {
        let dir = a.vector_to(&b);
        let length = dir.norm();
        if length < DEGENERATE_LENGTH {
            return None;
        }

        Some(Self {
            center: a.midpoint(&b),
            width: length,
            depth,
            rotation_deg: dir.y.atan2(dir.x).to_degrees(),
        })
    }

    /// Grow by `margin` on every side.
    pub fn inflate(&self, margin: f64) -> Self {
        Self {
            width: self.width + 2.0 * margin,
            depth: self.depth + 2.0 * margin,
            ..*self
        }
    }

    pub fn rotated_by(&self, degrees: f64) -> Self {
        Self {
            rotation_deg: self.rotation_deg + degrees,
            ..*self
        }
    }

    pub fn corners(&self) -> Corners {
        rect_corners(self.center, self.width, self.depth, self.rotation_deg)
    }
}
