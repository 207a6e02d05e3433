// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon utilities: extents, area, containment, snapping

use crate::point::Point2D;
use crate::projection::project_onto_segment;
use crate::DEGENERATE_LENGTH;
use serde::{Deserialize, Serialize};

/// Ordered, implicitly closed vertex list. Winding is not significant.
pub type Polygon = Vec<Point2D>;

/// Axis-aligned bounds of a point set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Extents {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Extents {
    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }

    /// Inclusive bounds test
    pub fn contains(&self, p: &Point2D) -> bool {
        self.min_x <= p.x && p.x <= self.max_x && self.min_z <= p.z && p.z <= self.max_z
    }
}

/// Bounds of `points`, or `None` for an empty slice.
pub fn extents(points: &[Point2D]) -> Option<Extents> {
    let first = points.first()?;
    let init = Extents {
        min_x: first.x,
        max_x: first.x,
        min_z: first.z,
        max_z: first.z,
    };

    Some(points.iter().fold(init, |acc, p| Extents {
        min_x: acc.min_x.min(p.x),
        max_x: acc.max_x.max(p.x),
        min_z: acc.min_z.min(p.z),
        max_z: acc.max_z.max(p.z),
    }))
}

/// Shift `points` so the center of their extents lands on the origin.
///
/// Returns the shifted points and the shift that was subtracted, so other
/// geometry measured in the same raw frame can be moved alongside.
pub fn recenter(points: &[Point2D]) -> (Vec<Point2D>, Point2D) {
    let Some(bounds) = extents(points) else {
        return (Vec::new(), Point2D::ORIGIN);
    };
    let c = bounds.center();
    let shifted = points.iter().map(|p| p.translate(-c.x, -c.z)).collect();
    (shifted, c)
}

/// Unsigned polygon area (shoelace formula)
pub fn polygon_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].z;
        area -= points[j].x * points[i].z;
    }

    (area / 2.0).abs()
}

/// Whether `point` lies on an edge of `polygon`, within [`DEGENERATE_LENGTH`]
pub fn point_on_boundary(point: &Point2D, polygon: &[Point2D]) -> bool {
    let n = polygon.len();
    (0..n).any(|i| {
        project_onto_segment(*point, polygon[i], polygon[(i + 1) % n])
            .is_some_and(|p| p.distance <= DEGENERATE_LENGTH)
    })
}

/// Ray-casting parity test, boundary inclusive.
///
/// Points on an edge count as inside. Everything else casts a ray towards
/// +x and counts edge crossings; only edges whose end points straddle the
/// ray's `z` can cross it, so horizontal edges never reach the division.
pub fn point_in_polygon(point: &Point2D, polygon: &[Point2D]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    if point_on_boundary(point, polygon) {
        return true;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];

        if (pi.z > point.z) != (pj.z > point.z) {
            let x_cross = (pj.x - pi.x) * (point.z - pi.z) / (pj.z - pi.z) + pi.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Round `value` to the nearest multiple of `step`. A non-positive step
/// leaves the value untouched.
pub fn snap_to_grid(value: f64, step: f64) -> f64 {
    if step <= 0.0 || !step.is_finite() {
        return value;
    }
    (value / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Polygon {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(size, 0.0),
            Point2D::new(size, size),
            Point2D::new(0.0, size),
        ]
    }

    /// L-shaped outline, notch cut from the top right
    fn l_shape() -> Polygon {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 4.0),
            Point2D::new(4.0, 4.0),
            Point2D::new(4.0, 10.0),
            Point2D::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_extents() {
        let e = extents(&l_shape()).unwrap();
        assert_eq!(e.min_x, 0.0);
        assert_eq!(e.max_x, 10.0);
        assert_eq!(e.center(), Point2D::new(5.0, 5.0));
        assert!(extents(&[]).is_none());
    }

    #[test]
    fn test_recenter() {
        let (centered, shift) = recenter(&square(10.0));
        assert_eq!(shift, Point2D::new(5.0, 5.0));
        assert_eq!(centered[0], Point2D::new(-5.0, -5.0));
        assert_eq!(extents(&centered).unwrap().center(), Point2D::ORIGIN);
    }

    #[test]
    fn test_area() {
        assert_eq!(polygon_area(&square(10.0)), 100.0);
        assert_eq!(polygon_area(&l_shape()), 64.0);

        let mut reversed = l_shape();
        reversed.reverse();
        assert_eq!(polygon_area(&reversed), 64.0);
    }

    #[test]
    fn test_point_in_convex() {
        let sq = square(10.0);
        assert!(point_in_polygon(&Point2D::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(&Point2D::new(11.0, 5.0), &sq));
        assert!(!point_in_polygon(&Point2D::new(5.0, -0.1), &sq));
    }

    #[test]
    fn test_point_in_concave() {
        let l = l_shape();
        assert!(point_in_polygon(&Point2D::new(2.0, 8.0), &l));
        assert!(point_in_polygon(&Point2D::new(8.0, 2.0), &l));
        // Inside the notch
        assert!(!point_in_polygon(&Point2D::new(7.0, 7.0), &l));
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        let sq = square(10.0);
        for p in [
            Point2D::new(0.0, 3.5),
            Point2D::new(10.0, 3.5),
            Point2D::new(4.0, 0.0),
            Point2D::new(4.0, 10.0),
            Point2D::new(10.0, 10.0),
        ] {
            assert!(point_on_boundary(&p, &sq));
            assert!(point_in_polygon(&p, &sq), "{:?} should be inside", p);
        }
        // Rounding noise on a rotated corner
        assert!(point_in_polygon(&Point2D::new(10.0 + 1e-12, 5.0), &sq));
        assert!(!point_in_polygon(&Point2D::new(10.0 + 1e-6, 5.0), &sq));

        // Inner corner of the notch
        let l = l_shape();
        assert!(point_in_polygon(&Point2D::new(4.0, 4.0), &l));
        assert!(point_in_polygon(&Point2D::new(7.0, 4.0), &l));
    }

    #[test]
    fn test_point_in_polygon_winding_independent() {
        let mut l = l_shape();
        l.reverse();
        assert!(point_in_polygon(&Point2D::new(2.0, 8.0), &l));
        assert!(!point_in_polygon(&Point2D::new(7.0, 7.0), &l));
    }

    #[test]
    fn test_point_in_degenerate_polygon() {
        let line = vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)];
        assert!(!point_in_polygon(&Point2D::new(5.0, 0.0), &line));
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(1.1, 0.25), 1.0);
        assert_eq!(snap_to_grid(1.13, 0.25), 1.25);
        assert_eq!(snap_to_grid(-0.4, 0.25), -0.5);
        assert_eq!(snap_to_grid(1.13, 0.0), 1.13);
    }
}
