// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall segments and their collision rectangles

use crate::types::{Wall, WallKind};
use nalgebra::Vector2;
use roomplan_geometry::{Corners, OrientedRect, Point2D};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Vertex pairs closer than this do not produce a segment
pub const MIN_SEGMENT_LENGTH: f64 = 1e-3;

/// One straight run of a wall polyline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WallSegment {
    pub wall_id: String,
    /// `"<wallId>#<index>"`
    pub segment_id: String,
    /// Index of the vertex pair this segment came from
    pub index: usize,
    pub kind: WallKind,
    pub start: Point2D,
    pub end: Point2D,
    /// Cumulative wall length at `start`
    pub start_along_parent: f64,
    /// Cumulative wall length at `end`
    pub end_along_parent: f64,
    pub thickness: f64,
}

impl WallSegment {
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Unit vector from `start` to `end`
    pub fn direction(&self) -> Vector2<f64> {
        self.start.vector_to(&self.end) / self.length()
    }

    /// Unit normal on the left of the direction of travel
    pub fn left_normal(&self) -> Vector2<f64> {
        let d = self.direction();
        Vector2::new(-d.y, d.x)
    }

    /// Point `offset` along the segment from `start`
    pub fn point_at(&self, offset: f64) -> Point2D {
        self.start.offset_by(&(self.direction() * offset))
    }

    /// Whether the wall-relative `offset` falls on this segment
    pub fn spans(&self, offset: f64) -> bool {
        self.start_along_parent <= offset && offset <= self.end_along_parent
    }

    pub fn segment_id_for(wall_id: &str, index: usize) -> String {
        format!("{}#{}", wall_id, index)
    }
}

/// Split a wall polyline into segments. Vertex pairs shorter than
/// [`MIN_SEGMENT_LENGTH`] are skipped but keep their index, so ids of the
/// remaining segments do not shift.
pub fn explode(wall: &Wall) -> Vec<WallSegment> {
    let mut segments = Vec::with_capacity(wall.polyline.len());
    let mut along = 0.0;

    for (index, (start, end)) in wall.vertex_pairs().enumerate() {
        let length = start.distance_to(&end);
        let start_along = along;
        along += length;

        if !length.is_finite() || length < MIN_SEGMENT_LENGTH {
            trace!(wall = %wall.id, index, length, "Skipping degenerate wall segment");
            continue;
        }

        segments.push(WallSegment {
            wall_id: wall.id.clone(),
            segment_id: WallSegment::segment_id_for(&wall.id, index),
            index,
            kind: wall.kind,
            start,
            end,
            start_along_parent: start_along,
            end_along_parent: along,
            thickness: wall.thickness,
        });
    }

    segments
}

/// Segments of every wall, in input order
pub fn explode_all(walls: &[Wall]) -> Vec<WallSegment> {
    walls.iter().flat_map(explode).collect()
}

/// Collision rectangle around one wall segment
#[derive(Debug, Clone, PartialEq)]
pub struct WallCollider {
    pub wall_id: String,
    pub segment_id: String,
    pub rect: OrientedRect,
    pub corners: Corners,
}

/// Rectangles centered on each segment's centerline, `thickness + gap`
/// deep and exactly as long as the segment.
pub fn build_colliders<'a, I>(segments: I, gap: f64) -> Vec<WallCollider>
where
    I: IntoIterator<Item = &'a WallSegment>,
{
    segments
        .into_iter()
        .filter_map(|seg| {
            let rect = OrientedRect::along_segment(seg.start, seg.end, seg.thickness + gap)?;
            Some(WallCollider {
                wall_id: seg.wall_id.clone(),
                segment_id: seg.segment_id.clone(),
                corners: rect.corners(),
                rect,
            })
        })
        .collect()
}
