// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the planner

use crate::calibration::CALIBRATION_EPSILON;
use roomplan_geometry::Point2D;
use thiserror::Error;

/// Result type for planner operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or driving the planner.
///
/// A rejected furniture placement is not an error: it is reported as a
/// `PlacementOutcome::Rejected` value. Openings that cannot be resolved are
/// not errors either; they are collected as diagnostics on the resolved
/// wall set.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Calibration reference points are degenerate: separation {separation} is below {min}", min = CALIBRATION_EPSILON)]
    CalibrationDegenerate { separation: f64 },

    #[error("Invalid calibration distance: {0} (must be finite and positive)")]
    InvalidCalibrationDistance(f64),

    #[error("Invalid calibration rotation: {0} degrees (must be finite)")]
    InvalidCalibrationRotation(f64),

    #[error("Invalid calibration scale: {0} (must be finite and positive)")]
    InvalidCalibrationScale(f64),

    #[error("Invalid calibration origin: {0:?} (must be finite)")]
    InvalidCalibrationOrigin(Point2D),

    #[error("No valid calibration available")]
    CalibrationMissing,

    #[error("Invalid floor plan configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown furniture item: {0}")]
    UnknownItem(String),

    #[error("Duplicate furniture item id: {0}")]
    DuplicateItem(String),

    #[error("No drag in progress")]
    NoActiveDrag,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
