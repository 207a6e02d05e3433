// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Nearest-wall snapping
//!
//! Finds the wall segment closest to a world point and reports where along
//! that wall the point lands. Used to place openings from clicks on a
//! reference image.

use crate::calibration::Calibration;
use crate::error::{Error, Result};
use crate::types::{DoorSpec, Hinge, Opening, OpeningDefaults, Swing, Wall, WindowSpec};
use crate::walls::{explode_all, WallSegment};
use roomplan_geometry::{project_onto_segment, Point2D};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where a point lands on its nearest wall
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WallSnap {
    pub wall_id: String,
    pub segment_id: String,
    /// Distance from the wall's first vertex
    pub offset_along_wall: f64,
    /// Distance from the segment start
    pub offset_along_segment: f64,
    pub perpendicular_distance: f64,
    pub point_on_wall: Point2D,
}

/// Nearest segment to `point`. On equal distances the earlier segment wins.
pub fn snap_to_nearest_segment(point: Point2D, segments: &[WallSegment]) -> Option<WallSnap> {
    let mut best: Option<WallSnap> = None;

    for seg in segments {
        let Some(proj) = project_onto_segment(point, seg.start, seg.end) else {
            continue;
        };
        if best
            .as_ref()
            .is_some_and(|b| proj.distance >= b.perpendicular_distance)
        {
            continue;
        }
        best = Some(WallSnap {
            wall_id: seg.wall_id.clone(),
            segment_id: seg.segment_id.clone(),
            offset_along_wall: seg.start_along_parent + proj.offset,
            offset_along_segment: proj.offset,
            perpendicular_distance: proj.distance,
            point_on_wall: proj.point,
        });
    }

    best
}

/// Nearest wall to `point`, over every segment of every wall in input order.
/// `None` only when no wall has a usable segment.
pub fn snap_to_nearest_wall(point: Point2D, walls: &[Wall]) -> Option<WallSnap> {
    snap_to_nearest_segment(point, &explode_all(walls))
}

/// Map a reference-image point into the world and snap it to a wall.
pub fn snap_reference_point(
    calibration: Option<&Calibration>,
    reference: Point2D,
    walls: &[Wall],
) -> Result<Option<WallSnap>> {
    let calibration = calibration.ok_or(Error::CalibrationMissing)?;
    let world = calibration.to_world(reference);
    let snap = snap_to_nearest_wall(world, walls);
    debug!(
        x = world.x,
        z = world.z,
        wall = snap.as_ref().map(|s| s.wall_id.as_str()),
        "Snapped reference point"
    );
    Ok(snap)
}

/// An opening waiting for a host wall position
#[derive(Debug, Clone, PartialEq)]
pub enum OpeningDraft {
    Door {
        id: String,
        width: Option<f64>,
        height: Option<f64>,
        hinge: Hinge,
        swing: Swing,
    },
    Window {
        id: String,
        width: Option<f64>,
        height: Option<f64>,
        sill_height: Option<f64>,
    },
}

impl OpeningDraft {
    /// Place the draft on the snapped wall. The snap marks the opening's
    /// center; a door's start edge is floored at the wall start.
    pub fn into_opening(self, snap: &WallSnap, defaults: &OpeningDefaults) -> Opening {
        match self {
            OpeningDraft::Door {
                id,
                width,
                height,
                hinge,
                swing,
            } => {
                let w = width.unwrap_or(defaults.door_width);
                Opening::Door(DoorSpec {
                    id,
                    host_wall_id: snap.wall_id.clone(),
                    offset_along_wall: (snap.offset_along_wall - w / 2.0).max(0.0),
                    width,
                    height,
                    hinge,
                    swing,
                })
            }
            OpeningDraft::Window {
                id,
                width,
                height,
                sill_height,
            } => Opening::Window(WindowSpec {
                id,
                host_wall_id: snap.wall_id.clone(),
                center_offset_along_wall: snap.offset_along_wall,
                width,
                height,
                sill_height,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{calibrate, WorldAxes};
    use crate::types::WallKind;
    use approx::assert_abs_diff_eq;

    fn walls() -> Vec<Wall> {
        vec![
            Wall::new(
                "south",
                WallKind::Exterior,
                vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0)],
            ),
            Wall::new(
                "east",
                WallKind::Exterior,
                vec![
                    Point2D::new(10.0, 0.0),
                    Point2D::new(10.0, 10.0),
                    Point2D::new(0.0, 10.0),
                ],
            ),
        ]
    }

    #[test]
    fn test_snap_picks_nearest() {
        let snap = snap_to_nearest_wall(Point2D::new(3.0, 7.0), &walls()).unwrap();
        assert_eq!(snap.wall_id, "east");
        assert_eq!(snap.segment_id, "east#1");
        assert_abs_diff_eq!(snap.offset_along_segment, 7.0);
        assert_abs_diff_eq!(snap.offset_along_wall, 17.0);
        assert_abs_diff_eq!(snap.perpendicular_distance, 3.0);
        assert_abs_diff_eq!(snap.point_on_wall.z, 10.0);
    }

    #[test]
    fn test_tie_goes_to_first_segment() {
        // Equidistant from "south" and the first segment of "east"
        let snap = snap_to_nearest_wall(Point2D::new(12.0, -2.0), &walls()).unwrap();
        assert_eq!(snap.wall_id, "south");
        assert_abs_diff_eq!(snap.offset_along_wall, 10.0);
    }

    #[test]
    fn test_no_usable_segment() {
        let w = Wall::new("dot", WallKind::Interior, vec![Point2D::new(1.0, 1.0)]);
        assert!(snap_to_nearest_wall(Point2D::ORIGIN, &[w]).is_none());
        assert!(snap_to_nearest_wall(Point2D::ORIGIN, &[]).is_none());
    }

    #[test]
    fn test_reference_point_requires_calibration() {
        let err = snap_reference_point(None, Point2D::ORIGIN, &walls()).unwrap_err();
        assert!(matches!(err, Error::CalibrationMissing));
    }

    #[test]
    fn test_reference_point_snaps_through_calibration() {
        let cal = calibrate(
            Point2D::new(0.0, 0.0),
            Point2D::new(100.0, 0.0),
            10.0,
            Point2D::ORIGIN,
            WorldAxes::default(),
        )
        .unwrap();
        let snap = snap_reference_point(Some(&cal), Point2D::new(40.0, 5.0), &walls())
            .unwrap()
            .unwrap();
        assert_eq!(snap.wall_id, "south");
        assert_abs_diff_eq!(snap.offset_along_wall, 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(snap.perpendicular_distance, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_draft_door_is_centered_on_snap() {
        let snap = snap_to_nearest_wall(Point2D::new(4.0, 1.0), &walls()).unwrap();
        let door = OpeningDraft::Door {
            id: "d".into(),
            width: None,
            height: None,
            hinge: Hinge::Left,
            swing: Swing::In,
        }
        .into_opening(&snap, &OpeningDefaults::default());
        match door {
            Opening::Door(d) => {
                assert_eq!(d.host_wall_id, "south");
                assert_abs_diff_eq!(d.offset_along_wall, 2.5);
            }
            Opening::Window(_) => panic!("expected a door"),
        }
    }

    #[test]
    fn test_draft_door_floors_at_wall_start() {
        let snap = snap_to_nearest_wall(Point2D::new(0.5, -1.0), &walls()).unwrap();
        let door = OpeningDraft::Door {
            id: "d".into(),
            width: Some(3.0),
            height: None,
            hinge: Hinge::Right,
            swing: Swing::Out,
        }
        .into_opening(&snap, &OpeningDefaults::default());
        let Opening::Door(d) = door else {
            panic!("expected a door");
        };
        assert_eq!(d.offset_along_wall, 0.0);
    }

    #[test]
    fn test_draft_window_keeps_center() {
        let snap = snap_to_nearest_wall(Point2D::new(6.0, 9.0), &walls()).unwrap();
        let window = OpeningDraft::Window {
            id: "n".into(),
            width: Some(2.0),
            height: None,
            sill_height: None,
        }
        .into_opening(&snap, &OpeningDefaults::default());
        let Opening::Window(w) = window else {
            panic!("expected a window");
        };
        assert_eq!(w.host_wall_id, "east");
        assert_abs_diff_eq!(w.center_offset_along_wall, 14.0);
    }
}
