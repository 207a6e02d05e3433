// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property checks for the geometry kernel over deterministic sweeps.

use approx::assert_abs_diff_eq;
use roomplan_geometry::{polygons_intersect, rect_corners, OrientedRect, Point2D};

/// Small deterministic generator so sweeps are reproducible without a rand dependency.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

#[test]
fn test_intersection_is_symmetric() {
    let mut rng = Lcg(0x5eed);
    let mut hits = 0;
    for _ in 0..2000 {
        let a = rect_corners(
            Point2D::new(rng.range(-5.0, 5.0), rng.range(-5.0, 5.0)),
            rng.range(0.1, 6.0),
            rng.range(0.1, 6.0),
            rng.range(0.0, 360.0),
        );
        let b = rect_corners(
            Point2D::new(rng.range(-5.0, 5.0), rng.range(-5.0, 5.0)),
            rng.range(0.1, 6.0),
            rng.range(0.1, 6.0),
            rng.range(0.0, 360.0),
        );
        let ab = polygons_intersect(&a, &b);
        assert_eq!(ab, polygons_intersect(&b, &a));
        if ab {
            hits += 1;
        }
    }
    // The sweep must exercise both outcomes.
    assert!(hits > 0 && hits < 2000);
}

#[test]
fn test_identical_rectangles_intersect() {
    let mut rng = Lcg(7);
    for _ in 0..200 {
        let r = rect_corners(
            Point2D::new(rng.range(-50.0, 50.0), rng.range(-50.0, 50.0)),
            rng.range(0.5, 8.0),
            rng.range(0.5, 8.0),
            rng.range(0.0, 360.0),
        );
        assert!(polygons_intersect(&r, &r));
    }
}

#[test]
fn test_square_rotated_four_quarter_turns_is_unchanged() {
    let square = OrientedRect::new(Point2D::new(3.0, -2.0), 2.5, 2.5, 17.0);
    let original = square.corners();

    let mut corners = original;
    for _ in 0..4 {
        corners = corners.map(|p| p.rotate_about(&square.center, 90.0));
    }

    for (p, q) in corners.iter().zip(original.iter()) {
        assert_abs_diff_eq!(p.x, q.x, epsilon = 1e-9);
        assert_abs_diff_eq!(p.z, q.z, epsilon = 1e-9);
    }
}

#[test]
fn test_square_footprint_quarter_turns_cover_same_area() {
    let square = OrientedRect::new(Point2D::new(1.0, 1.0), 3.0, 3.0, 0.0);
    let turned = (0..4).fold(square, |r, _| r.rotated_by(90.0));
    assert_abs_diff_eq!(turned.rotation_deg, 360.0);

    // A square turned by a quarter turn has the same corner set.
    let once = square.rotated_by(90.0).corners();
    for p in square.corners() {
        assert!(once
            .iter()
            .any(|q| (p.x - q.x).abs() < 1e-9 && (p.z - q.z).abs() < 1e-9));
    }
}
