//! fleet.rs — Registry of loaded boats, split into enabled and disabled
//!
//! Every loaded boat lives in exactly one of two maps keyed by name. Enabled
//! boats are animated, rendered and counted for end-of-race detection;
//! disabled boats keep advancing their trail in the background so they can
//! be re-enabled mid-race without a gap.
//!
//! Moves between the maps collect the names first, then move them one at a
//! time, so no map is mutated while it is being iterated.

use std::collections::BTreeMap;

use race_types::{BoatFrame, Extent, LonLat};
use tracing::debug;

use crate::boat::BoatState;

#[derive(Debug, Default)]
pub struct FleetRegistry {
    enabled: BTreeMap<String, BoatState>,
    disabled: BTreeMap<String, BoatState>,
    is_paused: bool,
    is_sailing: bool,
}

impl FleetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Membership ────────────────────────────────────────────────────────────

    /// Insert as enabled. A boat with the same name is replaced, whichever map it was in.
    pub fn add_boat(&mut self, boat: BoatState) {
        self.disabled.remove(&boat.name);
        if let Some(old) = self.enabled.insert(boat.name.clone(), boat) {
            debug!("Boat '{}' replaced by a later load", old.name);
        }
    }

    pub fn remove_boat(&mut self, name: &str) -> Option<BoatState> {
        self.enabled.remove(name).or_else(|| self.disabled.remove(name))
    }

    /// Remove every boat of `team_name`, returning how many were dropped.
    pub fn remove_team(&mut self, team_name: &str) -> usize {
        let before = self.total();
        self.enabled.retain(|_, b| b.team_name != team_name);
        self.disabled.retain(|_, b| b.team_name != team_name);
        before - self.total()
    }

    /// Move `name` to the enabled map. False if it was not disabled.
    pub fn enable_by_name(&mut self, name: &str) -> bool {
        match self.disabled.remove(name) {
            Some(boat) => {
                self.enabled.insert(boat.name.clone(), boat);
                true
            }
            None => false,
        }
    }

    /// Move `name` to the disabled map. False if it was not enabled.
    pub fn disable_by_name(&mut self, name: &str) -> bool {
        match self.enabled.remove(name) {
            Some(boat) => {
                self.disabled.insert(boat.name.clone(), boat);
                true
            }
            None => false,
        }
    }

    pub fn disable_all(&mut self) {
        let names: Vec<String> = self.enabled.keys().cloned().collect();
        for name in names {
            self.disable_by_name(&name);
        }
    }

    pub fn enable_all(&mut self) {
        let names: Vec<String> = self.disabled.keys().cloned().collect();
        for name in names {
            self.enable_by_name(&name);
        }
    }

    /// No name is in both maps.
    pub fn partition_is_consistent(&self) -> bool {
        self.enabled.keys().all(|name| !self.disabled.contains_key(name))
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.contains_key(name)
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&BoatState> {
        self.enabled.get(name).or_else(|| self.disabled.get(name))
    }

    pub fn enabled(&self) -> impl Iterator<Item = &BoatState> {
        self.enabled.values()
    }

    pub fn disabled(&self) -> impl Iterator<Item = &BoatState> {
        self.disabled.values()
    }

    /// Number of enabled boats.
    pub fn size(&self) -> usize {
        self.enabled.len()
    }

    pub fn total(&self) -> usize {
        self.enabled.len() + self.disabled.len()
    }

    // ── Flags ─────────────────────────────────────────────────────────────────

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.is_paused = paused;
    }

    pub fn is_sailing(&self) -> bool {
        self.is_sailing
    }

    // ── Per tick ──────────────────────────────────────────────────────────────

    /// Advance every boat to `timestamp`: enabled boats fully, disabled boats
    /// silently. Updates `is_sailing`; returns whether any enabled boat got
    /// an interpolated position this tick.
    pub fn advance(&mut self, timestamp: i64) -> bool {
        let mut sailing = false;
        let mut moved = false;
        for boat in self.enabled.values_mut() {
            sailing |= boat.sail(timestamp);
            moved |= boat.is_started();
        }
        for boat in self.disabled.values_mut() {
            boat.shadow(timestamp);
        }
        self.is_sailing = sailing;
        moved
    }

    pub fn frames(&self) -> Vec<BoatFrame> {
        self.enabled.values().filter_map(BoatState::frame).collect()
    }

    // ── Geometry ──────────────────────────────────────────────────────────────

    /// Bounding box of enabled boats in unwrapped longitude.
    /// None until at least one enabled boat has a position.
    pub fn extent(&self) -> Option<Extent> {
        Extent::from_points(self.enabled.values().filter_map(BoatState::absolute_coordinate))
    }

    pub fn center_coordinates(&self) -> Option<LonLat> {
        self.extent().map(|e| e.center())
    }

    // ── Visibility ────────────────────────────────────────────────────────────

    pub fn erase_enabled(&mut self) {
        self.enabled.values_mut().for_each(BoatState::erase);
    }

    pub fn erase_disabled(&mut self) {
        self.disabled.values_mut().for_each(BoatState::erase);
    }

    pub fn hide_disabled(&mut self) {
        self.disabled.values_mut().for_each(BoatState::hide);
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Clear flags and rewind every boat (trails, wrap counters) in both maps.
    pub fn reset(&mut self) {
        self.is_paused = false;
        self.is_sailing = false;
        self.enabled
            .values_mut()
            .chain(self.disabled.values_mut())
            .for_each(BoatState::reset);
    }

    /// Drop every boat.
    pub fn clear(&mut self) {
        self.enabled.clear();
        self.disabled.clear();
    }
}
