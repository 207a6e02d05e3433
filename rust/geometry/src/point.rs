// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-plane point type

use nalgebra::{Point2, Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// A location on the floor plane in world length units.
///
/// Serialized as `{"x": .., "z": ..}`. Plans authored in a plain 2D tool
/// use `y` for the second axis, which is accepted as an alias.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    #[serde(alias = "y")]
    pub z: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, z: 0.0 };

    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.z)
    }

    pub fn from_nalgebra(p: &Point2<f64>) -> Self {
        Self { x: p.x, z: p.y }
    }

    /// Position vector from the origin.
    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.z)
    }

    pub fn from_vector(v: &Vector2<f64>) -> Self {
        Self { x: v.x, z: v.y }
    }

    /// Vector pointing from `self` to `other`.
    pub fn vector_to(&self, other: &Point2D) -> Vector2<f64> {
        Vector2::new(other.x - self.x, other.z - self.z)
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        self.vector_to(other).norm()
    }

    pub fn translate(&self, dx: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    pub fn offset_by(&self, v: &Vector2<f64>) -> Self {
        Self::new(self.x + v.x, self.z + v.y)
    }

    /// Rotate about `center` by `degrees` (positive turns +x towards +z).
    pub fn rotate_about(&self, center: &Point2D, degrees: f64) -> Self {
        let rotated = Rotation2::new(degrees.to_radians()) * center.vector_to(self);
        center.offset_by(&rotated)
    }

    /// Linear interpolation: `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(&self, other: &Point2D, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.z + (other.z - self.z) * t,
        )
    }

    pub fn midpoint(&self, other: &Point2D) -> Self {
        self.lerp(other, 0.5)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, z): (f64, f64)) -> Self {
        Self::new(x, z)
    }
}
