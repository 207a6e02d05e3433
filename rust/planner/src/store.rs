// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placed furniture and interactive drags
//!
//! Every add, move and rotate is one validate-then-commit step: the
//! candidate is checked against the current [`FloorModel`] and the other
//! items, and only a valid candidate replaces the stored item. A drag is a
//! stream of such steps; a rejected step leaves the last committed
//! position in place.

use crate::error::{Error, Result};
use crate::model::FloorModel;
use crate::types::FurnitureItem;
use crate::validator::PlacementVerdict;
use roomplan_geometry::{snap_to_grid, Point2D};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Result of one validate-then-commit step
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    Committed,
    Rejected(PlacementVerdict),
}

impl PlacementOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, PlacementOutcome::Committed)
    }

    fn from_verdict(verdict: PlacementVerdict) -> Self {
        if verdict.is_valid() {
            PlacementOutcome::Committed
        } else {
            PlacementOutcome::Rejected(verdict)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DragSession {
    item_id: String,
    /// Item position minus the pointer position at grab time
    grab_offset: Point2D,
}

/// Furniture owned by one floor plan
#[derive(Debug, Clone, Default)]
pub struct PlacementStore {
    items: Vec<FurnitureItem>,
    index: FxHashMap<String, usize>,
    drag: Option<DragSession>,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load stored items without validating them against the floor.
    /// Items with a non-positive footprint and repeated ids are skipped.
    /// Returns the number of items kept.
    pub fn load(&mut self, items: impl IntoIterator<Item = FurnitureItem>) -> usize {
        let mut kept = 0;
        for item in items {
            if !item.has_valid_dimensions() {
                warn!(item = %item.id, "Discarding stored item with invalid footprint");
                continue;
            }
            if self.index.contains_key(&item.id) {
                warn!(item = %item.id, "Discarding stored item with repeated id");
                continue;
            }
            self.index.insert(item.id.clone(), self.items.len());
            self.items.push(item);
            kept += 1;
        }
        debug!(kept, total = self.items.len(), "Loaded furniture");
        kept
    }

    pub fn items(&self) -> &[FurnitureItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&FurnitureItem> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownItem(id.to_string()))
    }

    /// Validate `candidate` as a replacement for the item at `slot`
    fn commit(&mut self, model: &FloorModel, slot: usize, candidate: FurnitureItem) -> PlacementOutcome {
        let verdict = model.check(&candidate, Some(candidate.id.as_str()), &self.items);
        let outcome = PlacementOutcome::from_verdict(verdict);
        if outcome.is_committed() {
            self.items[slot] = candidate;
        }
        outcome
    }

    /// Place a new item. Fails only for a repeated id; an illegal placement
    /// is a `Rejected` outcome and nothing is stored.
    pub fn add(&mut self, model: &FloorModel, item: FurnitureItem) -> Result<PlacementOutcome> {
        if self.index.contains_key(&item.id) {
            return Err(Error::DuplicateItem(item.id));
        }

        let verdict = model.check(&item, None, &self.items);
        let outcome = PlacementOutcome::from_verdict(verdict);
        if outcome.is_committed() {
            debug!(item = %item.id, x = item.x, z = item.z, "Placed item");
            self.index.insert(item.id.clone(), self.items.len());
            self.items.push(item);
        }
        Ok(outcome)
    }

    /// Place a new item at the model's spawn point
    pub fn add_at_spawn(&mut self, model: &FloorModel, item: FurnitureItem) -> Result<PlacementOutcome> {
        self.add(model, item.at(model.spawn_point()))
    }

    pub fn move_to(&mut self, model: &FloorModel, id: &str, x: f64, z: f64) -> Result<PlacementOutcome> {
        let slot = self.position(id)?;
        let candidate = self.items[slot].clone().at(Point2D::new(x, z));
        Ok(self.commit(model, slot, candidate))
    }

    /// Rotate by `degrees`; the stored rotation stays in `[0, 360)`
    pub fn rotate_by(&mut self, model: &FloorModel, id: &str, degrees: f64) -> Result<PlacementOutcome> {
        let slot = self.position(id)?;
        let current = &self.items[slot];
        let rotation = (current.rotation + degrees).rem_euclid(360.0);
        let candidate = current.clone().with_rotation(rotation);
        Ok(self.commit(model, slot, candidate))
    }

    /// Rotate by the model's rotation step
    pub fn rotate(&mut self, model: &FloorModel, id: &str) -> Result<PlacementOutcome> {
        self.rotate_by(model, id, model.rotation_step())
    }

    /// Remove an item; always allowed
    pub fn remove(&mut self, id: &str) -> Result<FurnitureItem> {
        let slot = self.position(id)?;
        let item = self.items.remove(slot);
        self.index = self
            .items
            .iter()
            .enumerate()
            .map(|(i, it)| (it.id.clone(), i))
            .collect();
        if self.drag.as_ref().is_some_and(|d| d.item_id == id) {
            self.drag = None;
        }
        Ok(item)
    }

    /// Start dragging `id`, grabbed at `pointer`
    pub fn begin_drag(&mut self, id: &str, pointer: Point2D) -> Result<()> {
        let slot = self.position(id)?;
        let item = &self.items[slot];
        self.drag = Some(DragSession {
            item_id: item.id.clone(),
            grab_offset: Point2D::new(item.x - pointer.x, item.z - pointer.z),
        });
        Ok(())
    }

    /// Move the dragged item so it keeps its grab offset from `pointer`,
    /// snapped to the position grid. Commits only when valid.
    pub fn drag_to(&mut self, model: &FloorModel, pointer: Point2D) -> Result<PlacementOutcome> {
        let session = self.drag.as_ref().ok_or(Error::NoActiveDrag)?;
        let step = model.position_snap();
        let x = snap_to_grid(pointer.x + session.grab_offset.x, step);
        let z = snap_to_grid(pointer.z + session.grab_offset.z, step);
        let id = session.item_id.clone();
        self.move_to(model, &id, x, z)
    }

    /// Stop dragging. Returns whether a drag was in progress.
    pub fn end_drag(&mut self) -> bool {
        self.drag.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Items that no longer validate against `model`, with the reason.
    /// Nothing is moved.
    pub fn conflicts(&self, model: &FloorModel) -> Vec<(String, PlacementVerdict)> {
        self.items
            .iter()
            .filter_map(|item| {
                let verdict = model.check(item, Some(item.id.as_str()), &self.items);
                (!verdict.is_valid()).then(|| (item.id.clone(), verdict))
            })
            .collect()
    }
}
