// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Furniture layout validation for apartment floor plans
//!
//! This crate provides:
//! 1. Placement validation: outline containment plus SAT collision against
//!    wall colliders and other furniture
//! 2. Wall and opening resolution: doors and windows bound to wall
//!    segments, merged into blocked regions and complementary solid boxes
//! 3. Reference-image calibration and nearest-wall snapping
//! 4. A placement store with validate-then-commit moves, rotations and drags
//!
//! # Usage
//!
//! ```rust,ignore
//! use roomplan_planner::{FloorPlanConfig, FurnitureItem, Planner, Point2D};
//!
//! let mut planner = Planner::new(FloorPlanConfig::from_path("apartment.json")?)?;
//!
//! let sofa = FurnitureItem::new("sofa", "Sofa", 7.5, 3.1, 2.9).at(Point2D::new(-4.0, 2.0));
//! if planner.add(sofa)?.is_committed() {
//!     planner.rotate("sofa")?;
//! }
//!
//! for segment in &planner.model().resolved().segments {
//!     println!("{}: {} solid boxes", segment.segment.segment_id, segment.solids.len());
//! }
//! ```

pub mod calibration;
pub mod config;
pub mod error;
pub mod model;
pub mod planner;
pub mod resolver;
pub mod snapping;
pub mod store;
pub mod types;
pub mod validator;
pub mod walls;

// Re-export commonly used types and functions
pub use calibration::{
    calibrate, AxisConvention, Calibration, CalibrationRecord, WorldAxes, CALIBRATION_EPSILON,
};
pub use config::FloorPlanConfig;
pub use error::{Error, Result};
pub use model::FloorModel;
pub use planner::{Planner, SharedPlanner};
pub use resolver::{
    carve_segment, merge_ranges, resolve_walls, BlockedRegion, DoorSwing, DroppedOpening,
    Interval, OpeningUnresolvable, ResolvedOpening, ResolvedSegment, ResolvedWalls, SolidBox,
    MIN_OPENING_WIDTH, MIN_SOLID_LENGTH,
};
pub use roomplan_geometry::Point2D;
pub use snapping::{
    snap_reference_point, snap_to_nearest_segment, snap_to_nearest_wall, OpeningDraft, WallSnap,
};
pub use store::{PlacementOutcome, PlacementStore};
pub use types::{
    DoorSpec, FurnitureItem, Hinge, Opening, OpeningDefaults, OpeningKind, Swing, Wall, WallKind,
    WindowSpec,
};
pub use validator::{
    check_placement, footprint, is_valid_placement, PlacementVerdict, ValidatorSettings,
};
pub use walls::{build_colliders, explode, explode_all, WallCollider, WallSegment, MIN_SEGMENT_LENGTH};
