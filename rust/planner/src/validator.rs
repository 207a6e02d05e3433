// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Furniture placement validation
//!
//! A candidate placement is legal when its footprint:
//! 1. has positive, finite dimensions,
//! 2. keeps every corner inside the floor outline,
//! 3. clears every wall collider once grown by half the collision gap,
//! 4. clears every other placed item (both grown by half the gap).
//!
//! Containment only tests corners, so a footprint whose corners are all
//! inside but whose edge crosses a concave notch of the outline passes.

use crate::types::FurnitureItem;
use crate::walls::WallCollider;
use roomplan_geometry::{point_in_polygon, polygons_intersect, Corners, Point2D};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Default clearance kept between furniture and walls or other furniture
pub const DEFAULT_COLLISION_GAP: f64 = 0.2;

/// Tunables for [`check_placement`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidatorSettings {
    /// Total gap between two footprints, or between a footprint and a wall
    /// collider; each side contributes half
    pub collision_gap: f64,
    /// Margin added to the footprint before the outline containment test
    pub outline_clearance: f64,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            collision_gap: DEFAULT_COLLISION_GAP,
            outline_clearance: 0.0,
        }
    }
}

/// Outcome of validating one candidate placement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "verdict", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PlacementVerdict {
    Valid,
    /// Non-positive or non-finite size or pose
    InvalidFootprint,
    OutsideFloor { corner: Point2D },
    HitsWall { wall_id: String, segment_id: String },
    HitsItem { item_id: String },
}

impl PlacementVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, PlacementVerdict::Valid)
    }
}

/// Corners of `item`'s footprint grown by `margin` on every side
pub fn footprint(item: &FurnitureItem, margin: f64) -> Corners {
    item.footprint().inflate(margin).corners()
}

/// Validate `candidate` against the outline, the walls and every placed
/// item except the one with `ignore_id` (the item being moved).
pub fn check_placement(
    candidate: &FurnitureItem,
    ignore_id: Option<&str>,
    floor_outline: &[Point2D],
    wall_colliders: &[WallCollider],
    placed_items: &[FurnitureItem],
    settings: &ValidatorSettings,
) -> PlacementVerdict {
    if !candidate.has_valid_dimensions() {
        trace!(item = %candidate.id, "Rejected placement: invalid footprint");
        return PlacementVerdict::InvalidFootprint;
    }

    let contained = footprint(candidate, settings.outline_clearance);
    if let Some(corner) = contained
        .iter()
        .find(|c| !point_in_polygon(c, floor_outline))
    {
        trace!(item = %candidate.id, x = corner.x, z = corner.z, "Rejected placement: outside floor");
        return PlacementVerdict::OutsideFloor { corner: *corner };
    }

    let half_gap = settings.collision_gap / 2.0;
    let inflated = footprint(candidate, half_gap);

    if let Some(wall) = wall_colliders
        .iter()
        .find(|w| polygons_intersect(&inflated, &w.corners))
    {
        trace!(item = %candidate.id, segment = %wall.segment_id, "Rejected placement: wall");
        return PlacementVerdict::HitsWall {
            wall_id: wall.wall_id.clone(),
            segment_id: wall.segment_id.clone(),
        };
    }

    let hit = placed_items
        .iter()
        .filter(|other| ignore_id != Some(other.id.as_str()))
        .find(|other| polygons_intersect(&inflated, &footprint(other, half_gap)));
    if let Some(other) = hit {
        trace!(item = %candidate.id, other = %other.id, "Rejected placement: furniture");
        return PlacementVerdict::HitsItem {
            item_id: other.id.clone(),
        };
    }

    PlacementVerdict::Valid
}

/// Boolean form of [`check_placement`]
pub fn is_valid_placement(
    candidate: &FurnitureItem,
    ignore_id: Option<&str>,
    floor_outline: &[Point2D],
    wall_colliders: &[WallCollider],
    placed_items: &[FurnitureItem],
    settings: &ValidatorSettings,
) -> bool {
    check_placement(
        candidate,
        ignore_id,
        floor_outline,
        wall_colliders,
        placed_items,
        settings,
    )
    .is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Wall, WallKind};
    use crate::walls::{build_colliders, explode};

    fn outline() -> Vec<Point2D> {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
        ]
    }

    fn divider() -> Vec<WallCollider> {
        let wall = Wall::new(
            "divider",
            WallKind::Interior,
            vec![Point2D::new(5.0, 0.0), Point2D::new(5.0, 10.0)],
        );
        build_colliders(&explode(&wall), DEFAULT_COLLISION_GAP)
    }

    fn table(id: &str, x: f64, z: f64) -> FurnitureItem {
        FurnitureItem::new(id, "Table", 4.0, 3.0, 2.5).at(Point2D::new(x, z))
    }

    fn check(candidate: &FurnitureItem, placed: &[FurnitureItem]) -> PlacementVerdict {
        check_placement(
            candidate,
            Some(candidate.id.as_str()),
            &outline(),
            &divider(),
            placed,
            &ValidatorSettings::default(),
        )
    }

    #[test]
    fn test_clear_placement_is_valid() {
        assert_eq!(check(&table("t", 2.0, 5.0), &[]), PlacementVerdict::Valid);
    }

    #[test]
    fn test_flush_against_any_outline_edge() {
        // Each touches a different side of the room
        for (x, z) in [(2.0, 5.0), (8.0, 5.0), (2.0, 1.5), (2.0, 8.5), (8.0, 8.5)] {
            assert_eq!(check(&table("t", x, z), &[]), PlacementVerdict::Valid, "at ({}, {})", x, z);
        }
        // Quarter turn flush with the right and top edges
        let turned = table("t", 8.5, 8.0).with_rotation(90.0);
        assert!(check(&turned, &[]).is_valid());
    }

    #[test]
    fn test_placement_on_wall_is_rejected() {
        let verdict = check(&table("t", 5.0, 5.0), &[]);
        assert_eq!(
            verdict,
            PlacementVerdict::HitsWall {
                wall_id: "divider".into(),
                segment_id: "divider#0".into()
            }
        );
    }

    #[test]
    fn test_gap_to_wall_is_enforced() {
        // Footprint edge at x = 4.7; grown edge at 4.8 reaches the collider at 4.75
        assert!(!check(&table("t", 2.7, 5.0), &[]).is_valid());
        // Footprint edge at x = 4.5; grown edge at 4.6 stays clear
        assert!(check(&table("t", 2.5, 5.0), &[]).is_valid());
    }

    #[test]
    fn test_outside_floor() {
        let verdict = check(&table("t", -1.0, 5.0), &[]);
        assert!(matches!(verdict, PlacementVerdict::OutsideFloor { .. }));
    }

    #[test]
    fn test_outline_clearance() {
        let settings = ValidatorSettings {
            outline_clearance: 0.1,
            ..Default::default()
        };
        let candidate = table("t", 2.0, 5.0);
        let verdict = check_placement(&candidate, None, &outline(), &divider(), &[], &settings);
        assert!(matches!(verdict, PlacementVerdict::OutsideFloor { .. }));
    }

    #[test]
    fn test_item_collision_respects_ignore_id() {
        let placed = vec![table("a", 2.0, 2.0)];
        let mut moved = table("a", 2.0, 2.5);
        assert!(check(&moved, &placed).is_valid());

        moved.id = "b".into();
        assert_eq!(
            check(&moved, &placed),
            PlacementVerdict::HitsItem {
                item_id: "a".into()
            }
        );
    }

    #[test]
    fn test_items_need_full_gap() {
        // Depth 3, so a 3.1 spacing leaves a 0.1 gap (< 0.2)
        let placed = vec![table("a", 2.0, 2.0)];
        assert!(!check(&table("b", 2.0, 5.1), &placed).is_valid());
        assert!(check(&table("b", 2.0, 5.5), &placed).is_valid());
    }

    #[test]
    fn test_rotation_changes_validity() {
        // 4 x 3 rotated a quarter turn is 3 wide: edge at 4.0, grown edge at 4.1
        let rotated = table("t", 2.5, 5.0).with_rotation(90.0);
        assert!(check(&rotated, &[]).is_valid());
        let wide = table("t", 3.2, 5.0);
        assert!(!check(&wide, &[]).is_valid());
    }

    #[test]
    fn test_invalid_footprint() {
        let flat = FurnitureItem::new("f", "Rug", 0.0, 3.0, 0.1).at(Point2D::new(2.0, 5.0));
        assert_eq!(check(&flat, &[]), PlacementVerdict::InvalidFootprint);
        let lost = table("t", f64::NAN, 5.0);
        assert_eq!(check(&lost, &[]), PlacementVerdict::InvalidFootprint);
    }

    #[test]
    fn test_boolean_form_matches() {
        let candidate = table("t", 5.0, 5.0);
        assert!(!is_valid_placement(
            &candidate,
            None,
            &outline(),
            &divider(),
            &[],
            &ValidatorSettings::default()
        ));
    }
}
