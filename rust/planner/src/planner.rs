// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planner session: configuration, derived model, furniture and calibration

use crate::calibration::Calibration;
use crate::config::FloorPlanConfig;
use crate::error::{Error, Result};
use crate::model::FloorModel;
use crate::resolver::DroppedOpening;
use crate::snapping::{OpeningDraft, WallSnap};
use crate::store::{PlacementOutcome, PlacementStore};
use crate::types::{FurnitureItem, Opening};
use crate::validator::PlacementVerdict;
use roomplan_geometry::Point2D;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Owns one floor plan session.
///
/// The configuration and model are immutable values behind `Arc`s; every
/// configuration edit builds a new pair and swaps both in. A failing
/// rebuild leaves the previous pair untouched.
#[derive(Debug, Clone)]
pub struct Planner {
    config: Arc<FloorPlanConfig>,
    model: Arc<FloorModel>,
    store: PlacementStore,
    calibration: Option<Calibration>,
}

impl Planner {
    pub fn new(config: FloorPlanConfig) -> Result<Self> {
        let model = FloorModel::build(&config)?;
        Ok(Self {
            config: Arc::new(config),
            model: Arc::new(model),
            store: PlacementStore::new(),
            calibration: None,
        })
    }

    /// A planner for the measured sample apartment
    pub fn sample() -> Result<Self> {
        Self::new(FloorPlanConfig::sample_apartment())
    }

    pub fn config(&self) -> &Arc<FloorPlanConfig> {
        &self.config
    }

    pub fn model(&self) -> &Arc<FloorModel> {
        &self.model
    }

    pub fn store(&self) -> &PlacementStore {
        &self.store
    }

    pub fn items(&self) -> &[FurnitureItem] {
        self.store.items()
    }

    /// Replace the configuration. Returns the openings dropped by the new model.
    pub fn reconfigure(&mut self, config: FloorPlanConfig) -> Result<Vec<DroppedOpening>> {
        let model = FloorModel::build(&config)?;
        let dropped = model.dropped_openings().to_vec();
        self.config = Arc::new(config);
        self.model = Arc::new(model);
        info!(
            conflicts = self.store.conflicts(&self.model).len(),
            dropped = dropped.len(),
            "Rebuilt floor model"
        );
        Ok(dropped)
    }

    /// Replace the opening list and re-resolve every wall
    pub fn set_openings(&mut self, openings: Vec<Opening>) -> Result<Vec<DroppedOpening>> {
        let config = self.config.with_openings(openings);
        self.reconfigure(config)
    }

    pub fn add_opening(&mut self, opening: Opening) -> Result<Vec<DroppedOpening>> {
        let mut openings = self.config.openings.clone();
        openings.push(opening);
        self.set_openings(openings)
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    pub fn set_calibration(&mut self, calibration: Option<Calibration>) {
        debug!(calibrated = calibration.is_some(), "Calibration changed");
        self.calibration = calibration;
    }

    /// Snap a reference-image point to the nearest wall of the model
    pub fn snap_reference_point(&self, reference: Point2D) -> Result<Option<WallSnap>> {
        let calibration = self
            .calibration
            .as_ref()
            .ok_or(Error::CalibrationMissing)?;
        Ok(self.model.snap_reference(calibration, reference))
    }

    /// Snap a reference-image point and add `draft` there. Returns `None`
    /// when there is no wall to snap to.
    pub fn place_opening_at_reference(
        &mut self,
        draft: OpeningDraft,
        reference: Point2D,
    ) -> Result<Option<Vec<DroppedOpening>>> {
        let Some(snap) = self.snap_reference_point(reference)? else {
            return Ok(None);
        };
        let opening = draft.into_opening(&snap, &self.config.opening_defaults);
        self.add_opening(opening).map(Some)
    }

    pub fn add(&mut self, item: FurnitureItem) -> Result<PlacementOutcome> {
        self.store.add(&self.model, item)
    }

    pub fn add_at_spawn(&mut self, item: FurnitureItem) -> Result<PlacementOutcome> {
        self.store.add_at_spawn(&self.model, item)
    }

    pub fn load(&mut self, items: impl IntoIterator<Item = FurnitureItem>) -> usize {
        self.store.load(items)
    }

    pub fn move_to(&mut self, id: &str, x: f64, z: f64) -> Result<PlacementOutcome> {
        self.store.move_to(&self.model, id, x, z)
    }

    pub fn rotate(&mut self, id: &str) -> Result<PlacementOutcome> {
        self.store.rotate(&self.model, id)
    }

    pub fn rotate_by(&mut self, id: &str, degrees: f64) -> Result<PlacementOutcome> {
        self.store.rotate_by(&self.model, id, degrees)
    }

    pub fn remove(&mut self, id: &str) -> Result<FurnitureItem> {
        self.store.remove(id)
    }

    pub fn begin_drag(&mut self, id: &str, pointer: Point2D) -> Result<()> {
        self.store.begin_drag(id, pointer)
    }

    pub fn drag_to(&mut self, pointer: Point2D) -> Result<PlacementOutcome> {
        self.store.drag_to(&self.model, pointer)
    }

    pub fn end_drag(&mut self) -> bool {
        self.store.end_drag()
    }

    pub fn conflicts(&self) -> Vec<(String, PlacementVerdict)> {
        self.store.conflicts(&self.model)
    }
}

/// A [`Planner`] shared between threads. Each call holds the lock for one
/// whole validate-then-commit step.
#[derive(Debug, Clone)]
pub struct SharedPlanner {
    inner: Arc<Mutex<Planner>>,
}

impl SharedPlanner {
    pub fn new(planner: Planner) -> Self {
        Self {
            inner: Arc::new(Mutex::new(planner)),
        }
    }

    /// Poisoned locks are recovered: a commit is a single assignment, so
    /// the planner is never left half-updated.
    fn lock(&self) -> MutexGuard<'_, Planner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the planner
    pub fn with<R>(&self, f: impl FnOnce(&mut Planner) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn add(&self, item: FurnitureItem) -> Result<PlacementOutcome> {
        self.lock().add(item)
    }

    pub fn move_to(&self, id: &str, x: f64, z: f64) -> Result<PlacementOutcome> {
        self.lock().move_to(id, x, z)
    }

    pub fn rotate(&self, id: &str) -> Result<PlacementOutcome> {
        self.lock().rotate(id)
    }

    pub fn remove(&self, id: &str) -> Result<FurnitureItem> {
        self.lock().remove(id)
    }

    pub fn drag_to(&self, pointer: Point2D) -> Result<PlacementOutcome> {
        self.lock().drag_to(pointer)
    }

    pub fn reconfigure(&self, config: FloorPlanConfig) -> Result<Vec<DroppedOpening>> {
        self.lock().reconfigure(config)
    }

    /// Snapshot of the placed items
    pub fn items(&self) -> Vec<FurnitureItem> {
        self.lock().items().to_vec()
    }

    pub fn model(&self) -> Arc<FloorModel> {
        Arc::clone(self.lock().model())
    }
}
