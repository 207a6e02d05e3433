// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Checks against the measured sample apartment.
//!
//! Raw plan coordinates are shifted by the extents center (14 4/12, 12.75)
//! when the sample is built.

use approx::assert_abs_diff_eq;
use roomplan_planner::{FurnitureItem, PlacementVerdict, Planner, Point2D, ResolvedSegment};

const RAW_CENTER: Point2D = Point2D {
    x: 14.0 + 4.0 / 12.0,
    z: 12.75,
};

fn centered(x: f64, z: f64) -> Point2D {
    Point2D::new(x - RAW_CENTER.x, z - RAW_CENTER.z)
}

fn bed() -> FurnitureItem {
    FurnitureItem::new("bed", "Queen Bed", 5.2, 6.8, 2.0)
}

fn sofa() -> FurnitureItem {
    FurnitureItem::new("sofa", "Sofa", 7.5, 3.1, 2.9)
}

fn same_angle(a: f64, b: f64) -> bool {
    let d = (a - b).rem_euclid(360.0);
    d < 1e-6 || d > 360.0 - 1e-6
}

fn coverage_at(seg: &ResolvedSegment, height: f64) -> f64 {
    let blocked: f64 = seg
        .blocked
        .iter()
        .filter(|b| b.ranges.iter().any(|r| r.start < height && height < r.end))
        .map(|b| b.end - b.start)
        .sum();
    let solid: f64 = seg
        .solids
        .iter()
        .filter(|s| s.bottom < height && height < s.top)
        .map(|s| s.end - s.start)
        .sum();
    blocked + solid
}

#[test]
fn test_sample_builds_cleanly() {
    let planner = Planner::sample().unwrap();
    let model = planner.model();

    assert!(model.dropped_openings().is_empty());
    assert_eq!(model.resolved().openings().count(), 4);
    let spawn = model.spawn_point();
    assert_abs_diff_eq!(spawn.x, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(spawn.z, 0.0, epsilon = 1e-9);

    // Only interior walls stop furniture
    assert!(model
        .colliders()
        .iter()
        .all(|c| c.wall_id != "exterior"));
}

#[test]
fn test_sample_furniture_fits() {
    let mut planner = Planner::sample().unwrap();

    let bed = bed().at(Point2D::new(-9.0 - 1.0 / 3.0, -4.75));
    assert!(planner.add(bed).unwrap().is_committed());

    let sofa = sofa().at(Point2D::new(2.0 + 2.0 / 3.0, -4.75));
    assert!(planner.add(sofa).unwrap().is_committed());

    assert!(planner.conflicts().is_empty());
}

#[test]
fn test_bed_at_spawn_hits_closet_divider() {
    let mut planner = Planner::sample().unwrap();
    let outcome = planner.add_at_spawn(bed()).unwrap();
    match outcome {
        roomplan_planner::PlacementOutcome::Rejected(PlacementVerdict::HitsWall {
            wall_id,
            segment_id,
        }) => {
            assert_eq!(wall_id, "closet-divider");
            assert_eq!(segment_id, "closet-divider#0");
        }
        other => panic!("expected a wall hit, got {:?}", other),
    }
    assert!(planner.items().is_empty());
}

#[test]
fn test_sample_door_swings() {
    let planner = Planner::sample().unwrap();
    let resolved = planner.model().resolved();

    let bedroom_width = 10.0 + 7.0 / 12.0;
    let entry_right = bedroom_width + 13.5;
    let entry_left = entry_right - (9.0 + 7.0 / 12.0);
    let expected = [
        ("bedroom-door", centered(bedroom_width, 16.0), 1.2, 90.0),
        ("bath-door", centered(11.2, 24.8), 1.1, 270.0),
        ("closet-door", centered(entry_right, 26.6), 1.2, 180.0),
        ("entry-door", centered(entry_left + 1.2, 30.0), 1.15, 270.0),
    ];

    for (id, hinge, radius, start) in expected {
        let door = resolved.opening(id).unwrap();
        let swing = door.swing.as_ref().unwrap();
        println!(
            "{}: hinge ({:.4}, {:.4}) arc {:.1}..{:.1}",
            id, swing.hinge.x, swing.hinge.z, swing.start_angle_deg, swing.end_angle_deg
        );

        assert_abs_diff_eq!(swing.hinge.x, hinge.x, epsilon = 1e-6);
        assert_abs_diff_eq!(swing.hinge.z, hinge.z, epsilon = 1e-6);
        assert_abs_diff_eq!(swing.radius, radius, epsilon = 1e-9);
        assert_abs_diff_eq!(door.width(), radius, epsilon = 1e-9);
        assert!(same_angle(swing.start_angle_deg, start), "{} starts at {}", id, swing.start_angle_deg);
        assert_abs_diff_eq!(swing.end_angle_deg - swing.start_angle_deg, 90.0, epsilon = 1e-9);
    }
}

#[test]
fn test_sample_walls_partition_exactly() {
    let planner = Planner::sample().unwrap();
    let model = planner.model();
    let ceiling = model.ceiling_height();

    for seg in &model.resolved().segments {
        let length = seg.segment.length();
        for i in 1..40 {
            let h = ceiling * i as f64 / 40.0 + 1e-4;
            assert_abs_diff_eq!(coverage_at(seg, h), length, epsilon = 1e-6);
        }
    }
}
