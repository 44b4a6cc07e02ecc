//! # race-types
//!
//! Shared structures for the ocean race replay.
//!
//! These types are used by:
//! - `race-replay` (library): trace ingestion, interpolation, fleet animation
//! - `race-replay` (binary): control panel WebSocket payloads
//! - web control panel: JSON mirror of `ControlCommand` and `ReplayEvent`
//!
//! ## Coordinate Conventions
//!
//! - **Longitude**: degrees east, [-180, 180]. The ±180° meridian is the antimeridian.
//! - **Latitude**: degrees north, [-90, 90].
//! - **Timestamps**: milliseconds since the Unix epoch (virtual race clock).
//!
//! No type in this crate ever holds an "unwrapped" longitude; world-wrap
//! bookkeeping lives in the replay engine and only feeds extent math.

use serde::{Deserialize, Serialize};

// ── Coordinates ───────────────────────────────────────────────────────────────

/// Geographic position, longitude first (map x, map y).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

// ── Trace input ───────────────────────────────────────────────────────────────

/// One recorded GPS fix. Field names match the team trace files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSample {
    /// Fix time, ms since epoch
    pub ts: i64,
    pub lon: f64,
    pub lat: f64,
}

impl TraceSample {
    pub const fn new(ts: i64, lon: f64, lat: f64) -> Self {
        Self { ts, lon, lat }
    }

    pub fn position(&self) -> LonLat {
        LonLat::new(self.lon, self.lat)
    }
}

/// One entry of a team file: a boat and its full recorded trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoatRecord {
    pub name: String,
    /// CSS colour string, passed through to the renderer untouched
    pub color: String,
    pub trace: Vec<TraceSample>,
}

/// One entry of the team list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: String,
    pub name: String,
}

// ── Display mode ──────────────────────────────────────────────────────────────

/// How the view follows the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayMode {
    /// Free camera, no fleet marker
    None,
    /// Keep the fleet center in the middle of the view
    Centered,
    /// Center and fit the view on the fleet extent
    #[default]
    Focused,
}

// ── Bounding extent ───────────────────────────────────────────────────────────

/// Axis-aligned lon/lat rectangle. Longitudes may lie outside [-180, 180]
/// when built from unwrapped fleet positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Extent {
    /// Smallest extent containing every point. `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LonLat>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut extent = Extent {
            min_lon: first.lon,
            min_lat: first.lat,
            max_lon: first.lon,
            max_lat: first.lat,
        };
        for p in points {
            extent.min_lon = extent.min_lon.min(p.lon);
            extent.min_lat = extent.min_lat.min(p.lat);
            extent.max_lon = extent.max_lon.max(p.lon);
            extent.max_lat = extent.max_lat.max(p.lat);
        }
        Some(extent)
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Grow (factor > 1) or shrink the extent around its center.
    pub fn scale(&self, factor: f64) -> Self {
        let c = self.center();
        let half_w = self.width() * factor / 2.0;
        let half_h = self.height() * factor / 2.0;
        Extent {
            min_lon: c.lon - half_w,
            min_lat: c.lat - half_h,
            max_lon: c.lon + half_w,
            max_lat: c.lat + half_h,
        }
    }
}

// ── Control commands (UI → replay) ────────────────────────────────────────────

/// Commands from the control panel.
/// Wire format: `{ "cmd": "select_boat", "args": { "name": "..." } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "args", rename_all = "snake_case")]
pub enum ControlCommand {
    Play,
    Pause,
    IncreaseSpeed,
    DecreaseSpeed,
    Restart,
    Stop,
    SelectBoat {
        name: String,
        #[serde(default)]
        single: bool,
    },
    DeselectBoat {
        name: String,
    },
    DisableAllBoats,
    EnableAllBoats,
    SelectDisplayMode {
        mode: DisplayMode,
    },
    LoadTeam {
        id: String,
        #[serde(default)]
        single: bool,
    },
    UnloadTeam {
        id: String,
    },
}

// ── Replay output (replay → renderer) ─────────────────────────────────────────

/// Marker + trail of one visible boat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoatFrame {
    pub name: String,
    pub color: String,
    pub team: String,
    pub position: LonLat,
    /// Trail polyline, one segment per antimeridian-free stretch
    pub trail: Vec<Vec<LonLat>>,
}

/// Where the view should look this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    pub mode: DisplayMode,
    pub center: LonLat,
    /// Present in FOCUSED mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,
}

/// Everything the renderer needs after one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// Virtual timestamp the boats were evaluated at (ms)
    pub timestamp: i64,
    /// Current speed multiplier
    pub speed: f64,
    pub paused: bool,
    /// True on the tick that detected the natural end of the race
    pub finished: bool,
    pub boats: Vec<BoatFrame>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraFrame>,
}

/// Messages pushed to control panel clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    Frame(ReplayFrame),
    Teams { teams: Vec<TeamInfo>, loaded: Vec<String> },
    Stopped { restart_available: bool },
}
