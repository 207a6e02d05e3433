// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Convex polygon overlap via the Separating Axis Theorem.
//!
//! Exact for convex input, which is all this crate ever feeds it
//! (footprints and wall colliders are rectangles).

use crate::point::Point2D;
use crate::DEGENERATE_LENGTH;
use nalgebra::Vector2;

/// Unit normals of every non-degenerate edge of `poly`.
fn edge_normals(poly: &[Point2D]) -> impl Iterator<Item = Vector2<f64>> + '_ {
    let n = poly.len();
    (0..n).filter_map(move |i| {
        let edge = poly[i].vector_to(&poly[(i + 1) % n]);
        let normal = Vector2::new(-edge.y, edge.x);
        let length = normal.norm();
        (length > DEGENERATE_LENGTH).then(|| normal / length)
    })
}

/// Interval covered by `poly` when projected onto `axis`.
pub fn project_onto_axis(poly: &[Point2D], axis: &Vector2<f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for p in poly {
        let dot = p.to_vector().dot(axis);
        lo = lo.min(dot);
        hi = hi.max(dot);
    }
    (lo, hi)
}

fn separated_on(a: &[Point2D], b: &[Point2D], axis: &Vector2<f64>) -> bool {
    let (min_a, max_a) = project_onto_axis(a, axis);
    let (min_b, max_b) = project_onto_axis(b, axis);
    max_a < min_b || max_b < min_a
}

/// True if two convex polygons overlap.
///
/// Touching (shared edge or corner) counts as overlap: intervals are only
/// disjoint when strictly apart. The result does not depend on argument
/// order. A polygon whose edges are all degenerate (every vertex in one
/// spot) contributes the world axes instead, so a stray point is still
/// tested instead of passing unchallenged.
pub fn polygons_intersect(a: &[Point2D], b: &[Point2D]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    let mut tested_any = false;
    for axis in edge_normals(a).chain(edge_normals(b)) {
        tested_any = true;
        if separated_on(a, b, &axis) {
            return false;
        }
    }

    if !tested_any {
        return ![Vector2::x(), Vector2::y()]
            .iter()
            .any(|axis| separated_on(a, b, axis));
    }

    true
}
