// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference-image calibration
//!
//! Maps points measured on an external reference (pixels on a scanned
//! floor plan) into world units and back. Two reference points with a
//! known real-world separation fix the scale; the world axes fix the
//! orientation and handedness:
//!
//! ```text
//! world = origin + R(rotation) * M(convention) * scale * (p - A)
//! ```

use crate::error::{Error, Result};
use nalgebra::{Rotation2, Vector2};
use roomplan_geometry::Point2D;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Minimum separation between the two reference points
pub const CALIBRATION_EPSILON: f64 = 1e-6;

/// How reference axes relate to world axes before rotation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum AxisConvention {
    /// Reference x maps to world x, reference y to world z
    #[default]
    Direct,
    /// Reference y grows in the opposite direction (image rows)
    FlipVertical,
}

impl AxisConvention {
    fn apply(self, v: Vector2<f64>) -> Vector2<f64> {
        match self {
            AxisConvention::Direct => v,
            AxisConvention::FlipVertical => Vector2::new(v.x, -v.y),
        }
    }
}

/// Orientation of the reference frame in the world
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldAxes {
    pub convention: AxisConvention,
    /// Rotation applied after the convention, in degrees
    pub rotation_deg: f64,
}

impl WorldAxes {
    pub fn new(convention: AxisConvention, rotation_deg: f64) -> Self {
        Self {
            convention,
            rotation_deg,
        }
    }

    /// Image coordinates with rows growing downward, no rotation
    pub fn image() -> Self {
        Self::new(AxisConvention::FlipVertical, 0.0)
    }
}

/// Serialized calibration, as produced by a reference-image picker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationRecord {
    pub reference_a: Point2D,
    pub reference_b: Point2D,
    pub known_distance: f64,
    #[serde(default)]
    pub origin_world: Point2D,
    #[serde(default)]
    pub axes: WorldAxes,
}

/// A validated calibration. Only constructible through [`calibrate`] (or
/// its wrappers), so a value of this type is never degenerate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    reference_a: Point2D,
    reference_b: Point2D,
    known_distance: f64,
    origin_world: Point2D,
    axes: WorldAxes,
    scale: f64,
    rotation: Rotation2<f64>,
}

/// Build a calibration from two reference points a known distance apart.
///
/// `origin_world` is where `point_a` lands in the world.
pub fn calibrate(
    point_a: Point2D,
    point_b: Point2D,
    known_distance: f64,
    origin_world: Point2D,
    axes: WorldAxes,
) -> Result<Calibration> {
    let separation = point_a.distance_to(&point_b);
    if !separation.is_finite() || separation < CALIBRATION_EPSILON {
        warn!(separation, "Rejected calibration with coincident reference points");
        return Err(Error::CalibrationDegenerate { separation });
    }
    if !known_distance.is_finite() || known_distance <= 0.0 {
        warn!(known_distance, "Rejected calibration with invalid known distance");
        return Err(Error::InvalidCalibrationDistance(known_distance));
    }
    if !axes.rotation_deg.is_finite() {
        warn!(rotation = axes.rotation_deg, "Rejected calibration with invalid rotation");
        return Err(Error::InvalidCalibrationRotation(axes.rotation_deg));
    }
    if !origin_world.is_finite() {
        warn!(?origin_world, "Rejected calibration with invalid origin");
        return Err(Error::InvalidCalibrationOrigin(origin_world));
    }

    // Finite inputs can still over- or underflow
    let scale = known_distance / separation;
    if !scale.is_finite() || scale <= 0.0 {
        warn!(scale, "Rejected calibration with unusable scale");
        return Err(Error::InvalidCalibrationScale(scale));
    }
    debug!(scale, rotation = axes.rotation_deg, "Calibrated reference frame");

    Ok(Calibration {
        reference_a: point_a,
        reference_b: point_b,
        known_distance,
        origin_world,
        axes,
        scale,
        rotation: Rotation2::new(axes.rotation_deg.to_radians()),
    })
}

impl Calibration {
    /// Derive scale and rotation from two reference points whose world
    /// positions are both known.
    pub fn from_world_pair(
        reference_a: Point2D,
        reference_b: Point2D,
        world_a: Point2D,
        world_b: Point2D,
        convention: AxisConvention,
    ) -> Result<Self> {
        let world_separation = world_a.distance_to(&world_b);
        if !world_separation.is_finite() || world_separation < CALIBRATION_EPSILON {
            warn!(world_separation, "Rejected calibration with coincident world points");
            return Err(Error::CalibrationDegenerate {
                separation: world_separation,
            });
        }

        let local = convention.apply(reference_a.vector_to(&reference_b));
        let world = world_a.vector_to(&world_b);
        let rotation_deg = (world.y.atan2(world.x) - local.y.atan2(local.x)).to_degrees();

        calibrate(
            reference_a,
            reference_b,
            world_separation,
            world_a,
            WorldAxes::new(convention, rotation_deg),
        )
    }

    /// Rebuild a calibration from its stored form
    pub fn from_record(record: &CalibrationRecord) -> Result<Self> {
        calibrate(
            record.reference_a,
            record.reference_b,
            record.known_distance,
            record.origin_world,
            record.axes,
        )
    }

    pub fn to_record(&self) -> CalibrationRecord {
        CalibrationRecord {
            reference_a: self.reference_a,
            reference_b: self.reference_b,
            known_distance: self.known_distance,
            origin_world: self.origin_world,
            axes: self.axes,
        }
    }

    /// World units per reference unit
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn axes(&self) -> WorldAxes {
        self.axes
    }

    pub fn origin_world(&self) -> Point2D {
        self.origin_world
    }

    /// Map a reference point into world coordinates
    pub fn to_world(&self, p: Point2D) -> Point2D {
        let local = self.axes.convention.apply(self.reference_a.vector_to(&p)) * self.scale;
        self.origin_world.offset_by(&(self.rotation * local))
    }

    /// Map a world point back onto the reference. Exact inverse of
    /// [`Calibration::to_world`] up to floating tolerance.
    pub fn to_reference(&self, w: Point2D) -> Point2D {
        let unrotated = self.rotation.inverse() * self.origin_world.vector_to(&w);
        let local = self.axes.convention.apply(unrotated / self.scale);
        self.reference_a.offset_by(&local)
    }
}

impl TryFrom<CalibrationRecord> for Calibration {
    type Error = Error;

    fn try_from(record: CalibrationRecord) -> Result<Self> {
        Calibration::from_record(&record)
    }
}
