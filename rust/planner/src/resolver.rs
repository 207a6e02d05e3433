// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall and opening resolution
//!
//! Binds every opening to one wall segment, clamps it to that segment and
//! to the ceiling, then splits each segment into vertical bands at the
//! opening edges. Within a band the merged opening heights are blocked and
//! their complement up to the ceiling is solid wall, so at any height the
//! blocked and solid extents of a segment cover it exactly once.

use crate::types::{Hinge, Opening, OpeningDefaults, OpeningKind, Swing};
use crate::walls::WallSegment;
use roomplan_geometry::{OrientedRect, Point2D};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, warn};

/// Shortest band, solid box or vertical gap worth keeping
pub const MIN_SOLID_LENGTH: f64 = 0.01;

/// Narrowest opening that survives clamping
pub const MIN_OPENING_WIDTH: f64 = 0.05;

/// Merged height ranges of one band; rarely more than a door and a window
pub type RangeList = SmallVec<[Interval; 4]>;

/// Closed interval `[start, end]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, value: f64) -> bool {
        self.start <= value && value <= self.end
    }
}

/// Solid piece of wall, in segment-local offsets and heights
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SolidBox {
    pub start: f64,
    pub end: f64,
    pub bottom: f64,
    pub top: f64,
}

/// A run of adjacent bands sharing the same blocked height ranges
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockedRegion {
    pub start: f64,
    pub end: f64,
    pub ranges: Vec<Interval>,
}

/// Quarter arc swept by a door leaf
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoorSwing {
    pub hinge: Point2D,
    pub radius: f64,
    /// Counter-clockwise from `start_angle_deg` to `end_angle_deg`
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
}

/// An opening bound to one segment and clamped to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOpening {
    pub id: String,
    pub kind: OpeningKind,
    pub wall_id: String,
    pub segment_id: String,
    pub start_offset: f64,
    pub end_offset: f64,
    pub bottom: f64,
    pub top: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swing: Option<DoorSwing>,
}

impl ResolvedOpening {
    pub fn width(&self) -> f64 {
        self.end_offset - self.start_offset
    }
}

/// Why an opening was dropped during resolution
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OpeningUnresolvable {
    #[error("Host wall not found: {wall_id}")]
    UnknownWall { wall_id: String },

    #[error("Opening width {width} collapsed below the minimum after clamping")]
    CollapsedWidth { width: f64 },

    #[error("Opening height {height} collapsed below the minimum after clamping")]
    CollapsedHeight { height: f64 },

    #[error("Opening id already used by an earlier opening")]
    DuplicateId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DroppedOpening {
    pub id: String,
    pub reason: OpeningUnresolvable,
}

/// Resolution result for one segment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSegment {
    pub segment: WallSegment,
    /// Sorted by start offset
    pub openings: Vec<ResolvedOpening>,
    pub blocked: Vec<BlockedRegion>,
    pub solids: Vec<SolidBox>,
}

impl ResolvedSegment {
    /// World-space footprint of a solid box (height is carried by the box)
    pub fn solid_footprint(&self, solid: &SolidBox) -> OrientedRect {
        let seg = &self.segment;
        let center = seg.point_at((solid.start + solid.end) / 2.0);
        let dir = seg.direction();
        OrientedRect::new(
            center,
            solid.end - solid.start,
            seg.thickness,
            dir.y.atan2(dir.x).to_degrees(),
        )
    }
}

/// Resolved geometry for a full wall set
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedWalls {
    pub segments: Vec<ResolvedSegment>,
    pub dropped: Vec<DroppedOpening>,
}

impl ResolvedWalls {
    pub fn segment(&self, segment_id: &str) -> Option<&ResolvedSegment> {
        self.segments
            .iter()
            .find(|s| s.segment.segment_id == segment_id)
    }

    pub fn openings(&self) -> impl Iterator<Item = &ResolvedOpening> {
        self.segments.iter().flat_map(|s| s.openings.iter())
    }

    pub fn opening(&self, id: &str) -> Option<&ResolvedOpening> {
        self.openings().find(|o| o.id == id)
    }

    pub fn is_dropped(&self, id: &str) -> bool {
        self.dropped.iter().any(|d| d.id == id)
    }
}

/// Sort and merge overlapping or touching ranges. Ranges closer than
/// [`MIN_SOLID_LENGTH`] count as touching.
pub fn merge_ranges<I>(ranges: I) -> RangeList
where
    I: IntoIterator<Item = Interval>,
{
    let mut sorted: RangeList = ranges.into_iter().collect();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged = RangeList::new();
    for range in sorted {
        match merged.last_mut() {
            Some(last) if range.start <= last.end + MIN_SOLID_LENGTH => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}

/// Band edges: always starts at 0 and ends at `length`; cuts closer than
/// [`MIN_SOLID_LENGTH`] to the previous edge are folded into it.
fn band_boundaries(length: f64, openings: &[ResolvedOpening]) -> Vec<f64> {
    let mut cuts: Vec<f64> = openings
        .iter()
        .flat_map(|o| [o.start_offset, o.end_offset])
        .filter(|&x| x > MIN_SOLID_LENGTH && x < length - MIN_SOLID_LENGTH)
        .collect();
    cuts.sort_by(f64::total_cmp);

    let mut boundaries = Vec::with_capacity(cuts.len() + 2);
    boundaries.push(0.0);
    for x in cuts {
        if boundaries.last().is_some_and(|&last| x - last >= MIN_SOLID_LENGTH) {
            boundaries.push(x);
        }
    }
    boundaries.push(length);
    boundaries
}

/// Blocked height ranges for the band around `mid`, snapped to the floor
/// and ceiling when within [`MIN_SOLID_LENGTH`] of them.
fn blocked_at(mid: f64, openings: &[ResolvedOpening], ceiling: f64) -> RangeList {
    let mut ranges = merge_ranges(
        openings
            .iter()
            .filter(|o| o.start_offset <= mid && mid <= o.end_offset)
            .map(|o| Interval::new(o.bottom, o.top)),
    );
    for r in ranges.iter_mut() {
        if r.start < MIN_SOLID_LENGTH {
            r.start = 0.0;
        }
        if ceiling - r.end < MIN_SOLID_LENGTH {
            r.end = ceiling;
        }
    }
    ranges
}

/// Complement of `blocked` within `[0, ceiling]`
fn solid_ranges(blocked: &[Interval], ceiling: f64) -> RangeList {
    let mut solids = RangeList::new();
    let mut cursor = 0.0;
    for r in blocked {
        if r.start > cursor {
            solids.push(Interval::new(cursor, r.start));
        }
        cursor = cursor.max(r.end);
    }
    if cursor < ceiling {
        solids.push(Interval::new(cursor, ceiling));
    }
    solids
}

/// Split a segment of `length` into blocked regions and solid boxes.
///
/// `openings` must already be clamped to `[0, length]` and
/// `[0, ceiling]`.
pub fn carve_segment(
    length: f64,
    openings: &[ResolvedOpening],
    ceiling: f64,
) -> (Vec<BlockedRegion>, Vec<SolidBox>) {
    let mut blocked: Vec<BlockedRegion> = Vec::new();
    let mut solids = Vec::new();

    let boundaries = band_boundaries(length, openings);
    for band in boundaries.windows(2) {
        let (start, end) = (band[0], band[1]);
        if end - start < MIN_SOLID_LENGTH {
            continue;
        }

        let ranges = blocked_at((start + end) / 2.0, openings, ceiling);

        for s in solid_ranges(&ranges, ceiling) {
            if s.length() >= MIN_SOLID_LENGTH {
                solids.push(SolidBox {
                    start,
                    end,
                    bottom: s.start,
                    top: s.end,
                });
            }
        }

        if ranges.is_empty() {
            continue;
        }
        match blocked.last_mut() {
            Some(last) if last.end == start && last.ranges.as_slice() == ranges.as_slice() => {
                last.end = end;
            }
            _ => blocked.push(BlockedRegion {
                start,
                end,
                ranges: ranges.to_vec(),
            }),
        }
    }

    (blocked, solids)
}

/// Pick the segment hosting wall-relative `offset`. The first segment
/// containing it wins; offsets that fall in a gap left by a dropped
/// degenerate pair go to the closest segment.
fn host_segment<'a>(candidates: &[&'a WallSegment], offset: f64) -> Option<&'a WallSegment> {
    candidates
        .iter()
        .find(|s| s.spans(offset))
        .or_else(|| {
            candidates.iter().min_by(|a, b| {
                gap_to(a, offset).total_cmp(&gap_to(b, offset))
            })
        })
        .copied()
}

fn gap_to(seg: &WallSegment, offset: f64) -> f64 {
    (seg.start_along_parent - offset)
        .max(offset - seg.end_along_parent)
        .max(0.0)
}

fn door_swing(seg: &WallSegment, start: f64, end: f64, hinge: Hinge, swing: Swing) -> DoorSwing {
    let dir = seg.direction();
    let (hinge_offset, closed) = match hinge {
        Hinge::Left => (start, dir),
        Hinge::Right => (end, -dir),
    };
    let open = match swing {
        Swing::In => seg.left_normal(),
        Swing::Out => -seg.left_normal(),
    };

    // Sweep counter-clockwise through the quarter between the two leaf poses
    let closed_angle = closed.y.atan2(closed.x).to_degrees();
    let open_angle = open.y.atan2(open.x).to_degrees();
    let counter_clockwise = closed.x * open.y - closed.y * open.x > 0.0;
    let first = if counter_clockwise { closed_angle } else { open_angle };
    let start_angle_deg = first.rem_euclid(360.0);

    DoorSwing {
        hinge: seg.point_at(hinge_offset),
        radius: end - start,
        start_angle_deg,
        end_angle_deg: start_angle_deg + 90.0,
    }
}

fn resolve_opening(
    opening: &Opening,
    host: &[&WallSegment],
    defaults: &OpeningDefaults,
    ceiling: f64,
) -> Result<ResolvedOpening, OpeningUnresolvable> {
    let unknown = || OpeningUnresolvable::UnknownWall {
        wall_id: opening.host_wall_id().to_string(),
    };
    let wall_length = host.last().ok_or_else(unknown)?.end_along_parent;

    let center = opening.center_along_wall(defaults).clamp(0.0, wall_length);
    let seg = host_segment(host, center).ok_or_else(unknown)?;

    let (wall_start, wall_end) = opening.wall_span(defaults);
    let seg_length = seg.length();
    let start = (wall_start - seg.start_along_parent).clamp(0.0, seg_length);
    let end = (wall_end - seg.start_along_parent).clamp(0.0, seg_length);
    let width = end - start;
    if width.is_nan() || width < MIN_OPENING_WIDTH {
        return Err(OpeningUnresolvable::CollapsedWidth { width });
    }

    let (bottom, top) = opening.vertical_span(defaults);
    let bottom = bottom.clamp(0.0, ceiling);
    let top = top.clamp(0.0, ceiling);
    let height = top - bottom;
    if height.is_nan() || height < MIN_OPENING_WIDTH {
        return Err(OpeningUnresolvable::CollapsedHeight { height });
    }

    let swing = opening
        .door_hinge_and_swing()
        .map(|(hinge, swing)| door_swing(seg, start, end, hinge, swing));

    Ok(ResolvedOpening {
        id: opening.id().to_string(),
        kind: opening.kind(),
        wall_id: seg.wall_id.clone(),
        segment_id: seg.segment_id.clone(),
        start_offset: start,
        end_offset: end,
        bottom,
        top,
        swing,
    })
}

/// Resolve `openings` against `segments`.
///
/// Openings that cannot be placed are dropped and reported in
/// [`ResolvedWalls::dropped`]; everything else still resolves.
pub fn resolve_walls(
    segments: &[WallSegment],
    openings: &[Opening],
    defaults: &OpeningDefaults,
    ceiling: f64,
) -> ResolvedWalls {
    let mut by_wall: FxHashMap<&str, Vec<&WallSegment>> = FxHashMap::default();
    for seg in segments {
        by_wall.entry(seg.wall_id.as_str()).or_default().push(seg);
    }

    let mut per_segment: FxHashMap<String, Vec<ResolvedOpening>> = FxHashMap::default();
    let mut dropped = Vec::new();
    let mut seen: FxHashSet<&str> = FxHashSet::default();

    for opening in openings {
        let host = by_wall
            .get(opening.host_wall_id())
            .map(Vec::as_slice)
            .unwrap_or_default();

        // The first opening with an id keeps it, resolved or not
        let outcome = if seen.insert(opening.id()) {
            resolve_opening(opening, host, defaults, ceiling)
        } else {
            Err(OpeningUnresolvable::DuplicateId)
        };
        match outcome {
            Ok(resolved) => {
                per_segment
                    .entry(resolved.segment_id.clone())
                    .or_default()
                    .push(resolved);
            }
            Err(reason) => {
                warn!(opening = opening.id(), %reason, "Dropping unresolvable opening");
                dropped.push(DroppedOpening {
                    id: opening.id().to_string(),
                    reason,
                });
            }
        }
    }

    let resolved: Vec<ResolvedSegment> = segments
        .iter()
        .map(|seg| {
            let mut openings = per_segment
                .remove(&seg.segment_id)
                .unwrap_or_default();
            openings.sort_by(|a, b| a.start_offset.total_cmp(&b.start_offset));
            let (blocked, solids) = carve_segment(seg.length(), &openings, ceiling);
            ResolvedSegment {
                segment: seg.clone(),
                openings,
                blocked,
                solids,
            }
        })
        .collect();

    debug!(
        segments = resolved.len(),
        openings = openings.len() - dropped.len(),
        dropped = dropped.len(),
        "Resolved walls"
    );

    ResolvedWalls {
        segments: resolved,
        dropped,
    }
}
