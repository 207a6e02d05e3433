// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Derived floor geometry
//!
//! Everything computed from one [`FloorPlanConfig`]: the outline, wall
//! segments and colliders, and the resolved openings. Built wholesale and
//! never patched; a configuration change builds a new model.

use crate::calibration::Calibration;
use crate::config::FloorPlanConfig;
use crate::error::{Error, Result};
use crate::resolver::{resolve_walls, DroppedOpening, ResolvedWalls};
use crate::snapping::{snap_to_nearest_segment, WallSnap};
use crate::types::{FurnitureItem, Wall, WallKind};
use crate::validator::{check_placement, PlacementVerdict, ValidatorSettings};
use crate::walls::{build_colliders, explode_all, WallCollider, WallSegment};
use roomplan_geometry::{extents, Extents, Point2D};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FloorModel {
    outline: Vec<Point2D>,
    bounds: Extents,
    walls: Vec<Wall>,
    segments: Vec<WallSegment>,
    colliders: Vec<WallCollider>,
    resolved: ResolvedWalls,
    settings: ValidatorSettings,
    position_snap: f64,
    rotation_step: f64,
    ceiling_height: f64,
}

impl FloorModel {
    /// Validate `config` and derive the full model from it
    pub fn build(config: &FloorPlanConfig) -> Result<Self> {
        config.validate()?;

        let recentered;
        let config = if config.recenter {
            recentered = config.recentered();
            &recentered
        } else {
            config
        };

        let bounds = extents(&config.floor_outline)
            .ok_or_else(|| Error::InvalidConfig("floor outline is empty".to_string()))?;

        let segments = explode_all(&config.walls);
        let colliders = build_colliders(
            segments
                .iter()
                .filter(|s| config.exterior_walls_collide || s.kind == WallKind::Interior),
            config.collision_gap,
        );
        let resolved = resolve_walls(
            &segments,
            &config.openings,
            &config.opening_defaults,
            config.ceiling_height,
        );

        debug!(
            walls = config.walls.len(),
            segments = segments.len(),
            colliders = colliders.len(),
            openings = config.openings.len(),
            dropped = resolved.dropped.len(),
            "Built floor model"
        );

        Ok(Self {
            outline: config.floor_outline.clone(),
            bounds,
            walls: config.walls.clone(),
            segments,
            colliders,
            resolved,
            settings: config.validator_settings(),
            position_snap: config.position_snap,
            rotation_step: config.rotation_step,
            ceiling_height: config.ceiling_height,
        })
    }

    pub fn outline(&self) -> &[Point2D] {
        &self.outline
    }

    pub fn bounds(&self) -> Extents {
        self.bounds
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn segments(&self) -> &[WallSegment] {
        &self.segments
    }

    pub fn colliders(&self) -> &[WallCollider] {
        &self.colliders
    }

    pub fn resolved(&self) -> &ResolvedWalls {
        &self.resolved
    }

    /// Openings that could not be resolved on this model
    pub fn dropped_openings(&self) -> &[DroppedOpening] {
        &self.resolved.dropped
    }

    pub fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }

    pub fn position_snap(&self) -> f64 {
        self.position_snap
    }

    pub fn rotation_step(&self) -> f64 {
        self.rotation_step
    }

    pub fn ceiling_height(&self) -> f64 {
        self.ceiling_height
    }

    /// Where new items are dropped: the center of the outline's extents
    pub fn spawn_point(&self) -> Point2D {
        self.bounds.center()
    }

    /// Validate a candidate against this model and `placed` items
    pub fn check(
        &self,
        candidate: &FurnitureItem,
        ignore_id: Option<&str>,
        placed: &[FurnitureItem],
    ) -> PlacementVerdict {
        check_placement(
            candidate,
            ignore_id,
            &self.outline,
            &self.colliders,
            placed,
            &self.settings,
        )
    }

    /// Nearest wall to a world point
    pub fn snap(&self, point: Point2D) -> Option<WallSnap> {
        snap_to_nearest_segment(point, &self.segments)
    }

    /// Nearest wall to a reference-image point
    pub fn snap_reference(&self, calibration: &Calibration, reference: Point2D) -> Option<WallSnap> {
        self.snap(calibration.to_world(reference))
    }
}
