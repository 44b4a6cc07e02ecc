//! boat.rs — Per-boat replay state
//!
//! A boat owns its validated track and its trail, plus what the renderer
//! needs between ticks: the current marker position, marker visibility and
//! the `started` flag of the current run.
//!
//! `world_idx` counts antimeridian wraps (+1 crossing eastward over +180°,
//! -1 westward). It never touches the rendered coordinate; the fleet adds
//! `world_idx × 360` to get a continuous longitude for extent math.

use race_types::{BoatFrame, BoatRecord, LonLat};

use crate::antimeridian;
use crate::error::Result;
use crate::track::TrackInterpolator;
use crate::trail::TrailBuilder;

#[derive(Debug, Clone)]
pub struct BoatState {
    pub name: String,
    pub color: String,
    pub team_name: String,
    track: TrackInterpolator,
    trail: TrailBuilder,
    current: Option<LonLat>,
    previous: Option<LonLat>,
    world_idx: i32,
    started: bool,
    marker_visible: bool,
}

impl BoatState {
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        team_name: impl Into<String>,
        trace: Vec<race_types::TraceSample>,
    ) -> Result<Self> {
        let name = name.into();
        let track = TrackInterpolator::new(&name, trace)?;
        Ok(Self {
            name,
            color: color.into(),
            team_name: team_name.into(),
            track,
            trail: TrailBuilder::new(),
            current: None,
            previous: None,
            world_idx: 0,
            started: false,
            marker_visible: false,
        })
    }

    pub fn from_record(record: BoatRecord, team_name: &str) -> Result<Self> {
        Self::new(record.name, record.color, team_name, record.trace)
    }

    pub fn track(&self) -> &TrackInterpolator {
        &self.track
    }

    pub fn trail(&self) -> &TrailBuilder {
        &self.trail
    }

    pub fn max_timestamp(&self) -> i64 {
        self.track.max_timestamp()
    }

    pub fn current_coordinate(&self) -> Option<LonLat> {
        self.current
    }

    pub fn world_idx(&self) -> i32 {
        self.world_idx
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_displayed(&self) -> bool {
        self.marker_visible
    }

    /// Current longitude with wraps undone, for fleet extent math only.
    pub fn absolute_coordinate(&self) -> Option<LonLat> {
        self.current
            .map(|c| LonLat::new(c.lon + f64::from(self.world_idx) * 360.0, c.lat))
    }

    pub fn set_coordinate(&mut self, coordinate: LonLat) {
        if let Some(prev) = self.previous {
            let tripped = coordinate.lon - prev.lon;
            if antimeridian::crosses(prev.lon, coordinate.lon) {
                self.world_idx += if tripped < 0.0 { 1 } else { -1 };
            }
        }
        self.current = Some(coordinate);
        self.previous = Some(coordinate);
    }

    /// Advance an enabled boat to `timestamp`.
    ///
    /// Returns whether the boat keeps the race going: true while `timestamp`
    /// has not passed the end of its trace, even before its first sample.
    pub fn sail(&mut self, timestamp: i64) -> bool {
        match self.track.position(timestamp) {
            Some(coordinate) => {
                self.started = true;
                self.set_coordinate(coordinate);
                self.trail.add_point(coordinate);
            }
            None if self.started && timestamp >= self.max_timestamp() => {
                // park on the last fix and show it once
                let end = self.track.end_position();
                self.set_coordinate(end);
                self.trail.add_point(end);
                self.display();
                self.started = false;
            }
            None => {}
        }

        if self.started {
            self.display();
        }

        if timestamp <= self.max_timestamp() {
            true
        } else {
            self.started = false;
            false
        }
    }

    /// Advance a disabled boat: position and trail only, nothing shown.
    pub fn shadow(&mut self, timestamp: i64) {
        if let Some(coordinate) = self.track.position(timestamp) {
            self.set_coordinate(coordinate);
            self.trail.add_point(coordinate);
        }
    }

    pub fn display(&mut self) {
        self.marker_visible = true;
        self.trail.display();
    }

    /// Hide the marker and the trail, keep the trail for later.
    pub fn hide(&mut self) {
        self.marker_visible = false;
        self.trail.hide();
    }

    /// Hide the marker and drop the trail.
    pub fn erase(&mut self) {
        self.marker_visible = false;
        self.trail.erase();
    }

    /// Back to the pre-race state, keeping identity and trace.
    pub fn reset(&mut self) {
        self.previous = None;
        self.current = None;
        self.world_idx = 0;
        self.started = false;
        self.trail.reset();
    }

    /// Snapshot for the renderer, if the marker is showing.
    pub fn frame(&self) -> Option<BoatFrame> {
        if !self.marker_visible {
            return None;
        }
        let position = self.current?;
        Some(BoatFrame {
            name: self.name.clone(),
            color: self.color.clone(),
            team: self.team_name.clone(),
            position,
            trail: self.trail.rendered().map(<[_]>::to_vec).unwrap_or_default(),
        })
    }
}
