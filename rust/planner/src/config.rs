// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor plan configuration
//!
//! The configuration is an immutable value. Editing it means building a
//! new value and a new [`FloorModel`](crate::FloorModel) from it.

use crate::error::{Error, Result};
use crate::snapping::snap_to_nearest_segment;
use crate::types::{DoorSpec, Hinge, Opening, OpeningDefaults, Swing, Wall, WallKind};
use crate::validator::{ValidatorSettings, DEFAULT_COLLISION_GAP};
use crate::walls::explode;
use roomplan_geometry::{extents, polygon_area, Point2D, DEGENERATE_LENGTH};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default grid step for dragged positions (feet)
pub const DEFAULT_POSITION_SNAP: f64 = 0.25;

/// Default rotation step (degrees)
pub const DEFAULT_ROTATION_STEP: f64 = 90.0;

/// Default ceiling height (feet)
pub const DEFAULT_CEILING_HEIGHT: f64 = 8.0;

/// Static description of one apartment floor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FloorPlanConfig {
    /// Boundary every furniture corner must stay inside
    pub floor_outline: Vec<Point2D>,
    pub walls: Vec<Wall>,
    pub ceiling_height: f64,
    pub opening_defaults: OpeningDefaults,
    pub openings: Vec<Opening>,
    pub collision_gap: f64,
    pub position_snap: f64,
    pub rotation_step: f64,
    pub outline_clearance: f64,
    /// Build colliders for exterior walls too. Off by default: the outline
    /// already keeps furniture inside the exterior.
    pub exterior_walls_collide: bool,
    /// Shift all geometry so the outline's extents are centered on the origin
    pub recenter: bool,
}

impl Default for FloorPlanConfig {
    fn default() -> Self {
        Self {
            floor_outline: Vec::new(),
            walls: Vec::new(),
            ceiling_height: DEFAULT_CEILING_HEIGHT,
            opening_defaults: OpeningDefaults::default(),
            openings: Vec::new(),
            collision_gap: DEFAULT_COLLISION_GAP,
            position_snap: DEFAULT_POSITION_SNAP,
            rotation_step: DEFAULT_ROTATION_STEP,
            outline_clearance: 0.0,
            exterior_walls_collide: false,
            recenter: false,
        }
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidConfig(msg.into())
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{} must be finite and non-negative, got {}", name, value)))
    }
}

impl FloorPlanConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = json.len(), "Loading floor plan configuration");
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check structural requirements. Openings are not checked here;
    /// unresolvable or duplicated openings are reported by the resolver.
    pub fn validate(&self) -> Result<()> {
        if self.floor_outline.len() < 3 {
            return Err(invalid(format!(
                "floor outline needs at least 3 points, got {}",
                self.floor_outline.len()
            )));
        }
        if !self.floor_outline.iter().all(Point2D::is_finite) {
            return Err(invalid("floor outline has non-finite coordinates"));
        }
        if polygon_area(&self.floor_outline) < DEGENERATE_LENGTH {
            return Err(invalid("floor outline encloses no area"));
        }
        if !(self.ceiling_height.is_finite() && self.ceiling_height > 0.0) {
            return Err(invalid(format!(
                "ceiling height must be positive, got {}",
                self.ceiling_height
            )));
        }
        non_negative("collision gap", self.collision_gap)?;
        non_negative("position snap", self.position_snap)?;
        non_negative("outline clearance", self.outline_clearance)?;
        if !self.rotation_step.is_finite() {
            return Err(invalid("rotation step must be finite"));
        }

        let mut wall_ids = FxHashSet::default();
        for wall in &self.walls {
            if !wall_ids.insert(wall.id.as_str()) {
                return Err(invalid(format!("duplicate wall id: {}", wall.id)));
            }
            non_negative(&format!("thickness of wall {}", wall.id), wall.thickness)?;
            if !wall.polyline.iter().all(Point2D::is_finite) {
                return Err(invalid(format!("wall {} has non-finite coordinates", wall.id)));
            }
        }

        Ok(())
    }

    pub fn validator_settings(&self) -> ValidatorSettings {
        ValidatorSettings {
            collision_gap: self.collision_gap,
            outline_clearance: self.outline_clearance,
        }
    }

    /// Same configuration with the outline and walls shifted so the
    /// outline's extents are centered on the origin. Openings are
    /// wall-relative and need no shift.
    pub fn recentered(&self) -> Self {
        let shift = extents(&self.floor_outline)
            .map(|e| e.center())
            .unwrap_or(Point2D::ORIGIN);
        let move_point = |p: &Point2D| p.translate(-shift.x, -shift.z);

        Self {
            floor_outline: self.floor_outline.iter().map(move_point).collect(),
            walls: self
                .walls
                .iter()
                .map(|w| Wall {
                    polyline: w.polyline.iter().map(move_point).collect(),
                    ..w.clone()
                })
                .collect(),
            recenter: false,
            ..self.clone()
        }
    }

    /// Same configuration with a different opening list
    pub fn with_openings(&self, openings: Vec<Opening>) -> Self {
        Self {
            openings,
            ..self.clone()
        }
    }

    /// The measured one-bedroom apartment: bedroom, living room, kitchen
    /// return, bathroom and entry closet, centered on its extents.
    pub fn sample_apartment() -> Self {
        let bedroom_width = 10.0 + 7.0 / 12.0;
        let living_width = 13.5;
        let kitchen_return = 4.0 + 7.0 / 12.0;
        let entry_span = 9.0 + 7.0 / 12.0;
        let total_depth = 30.0;
        let right_drop = 15.0;
        let kitchen_top_rise = 4.5;
        let hall_depth = 16.0;
        let divider_run = 11.0 + 11.0 / 12.0;

        let x_entry_right = bedroom_width + living_width;
        let x_entry_left = x_entry_right - entry_span;
        let x_right_outer = x_entry_right + kitchen_return;
        let z_entry_notch = total_depth - 2.8;
        let z_bath_notch = total_depth - 5.2;
        let closet_x = bedroom_width + 1.15;

        let p = Point2D::new;
        let outline = vec![
            p(0.0, 0.0),
            p(x_entry_right, 0.0),
            p(x_entry_right, -kitchen_top_rise),
            p(x_right_outer, -kitchen_top_rise),
            p(x_right_outer, right_drop),
            p(x_entry_right, right_drop),
            p(x_entry_right, total_depth),
            p(x_entry_left, total_depth),
            p(x_entry_left, z_entry_notch),
            p(11.0, z_entry_notch),
            p(11.0, z_bath_notch),
            p(9.0, z_bath_notch),
            p(9.0, total_depth),
            p(0.0, total_depth),
        ];

        let walls = vec![
            Wall::new("exterior", WallKind::Exterior, outline.clone()).closed(),
            Wall::new(
                "bedroom-hall",
                WallKind::Interior,
                vec![p(bedroom_width, 0.0), p(bedroom_width, hall_depth)],
            ),
            // Not part of the measured walls: a stub in the hall doorway that only
            // exists to host the bedroom door, which opens past the end of the hall wall
            Wall::new(
                "bedroom-doorway",
                WallKind::Interior,
                vec![p(bedroom_width, hall_depth), p(bedroom_width, hall_depth + 1.2)],
            ),
            Wall::new(
                "closet-divider",
                WallKind::Interior,
                vec![
                    p(closet_x, 2.2),
                    p(closet_x, divider_run),
                    p(bedroom_width, divider_run),
                ],
            ),
            Wall::new(
                "entry-side",
                WallKind::Interior,
                vec![p(x_entry_right, right_drop), p(x_entry_right, total_depth)],
            ),
            Wall::new(
                "bath-closet",
                WallKind::Interior,
                vec![p(11.0, z_bath_notch), p(x_entry_left, z_bath_notch)],
            ),
        ];

        let openings = [
            ("bedroom-door", "bedroom-doorway", p(bedroom_width, hall_depth), 1.2, Hinge::Left, Swing::In),
            ("bath-door", "bath-closet", p(11.2, z_bath_notch), 1.1, Hinge::Left, Swing::Out),
            ("closet-door", "exterior", p(x_entry_right, total_depth - 3.4), 1.2, Hinge::Right, Swing::In),
            ("entry-door", "exterior", p(x_entry_left + 1.2, total_depth), 1.15, Hinge::Right, Swing::In),
        ]
        .into_iter()
        .filter_map(|(id, wall_id, hinge_at, width, hinge, swing)| {
            let wall = walls.iter().find(|w| w.id == wall_id)?;
            door_hinged_at(id, wall, hinge_at, width, hinge, swing)
        })
        .collect();

        Self {
            floor_outline: outline,
            walls,
            openings,
            recenter: true,
            ..Self::default()
        }
        .recentered()
    }
}

/// A door on `wall` whose hinge sits at `hinge_at`
fn door_hinged_at(
    id: &str,
    wall: &Wall,
    hinge_at: Point2D,
    width: f64,
    hinge: Hinge,
    swing: Swing,
) -> Option<Opening> {
    let snap = snap_to_nearest_segment(hinge_at, &explode(wall))?;
    let offset = match hinge {
        Hinge::Left => snap.offset_along_wall,
        Hinge::Right => snap.offset_along_wall - width,
    };
    Some(Opening::Door(DoorSpec {
        id: id.to_string(),
        host_wall_id: wall.id.clone(),
        offset_along_wall: offset,
        width: Some(width),
        height: None,
        hinge,
        swing,
    }))
}
