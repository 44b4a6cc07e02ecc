//! clock.rs — Fleet animation clock and replay session
//!
//! Owns everything that changes while a race replays: the fleet, the speed
//! ladder, the virtual timestamp, the display mode and the loaded teams.
//! The host calls `tick()` once per rendered frame and routes control
//! commands to the methods below; both must be serialized by the caller.
//!
//! State machine:
//!
//! ```text
//!   OFF ──play──▶ PLAYING ◀──play── PAUSED
//!    ▲              │  ▲              ▲
//!    │              │  └──restart─────┤
//!    │              └──────pause──────┘
//!    └──── stop / natural end of race
//! ```
//!
//! Within one tick every boat is evaluated against the same timestamp, and
//! only then does the timestamp move on.

use race_types::{CameraFrame, ControlCommand, DisplayMode, ReplayFrame};
use tracing::{debug, info, warn};

use crate::boat::BoatState;
use crate::fleet::FleetRegistry;
use crate::speed::SpeedControl;

/// Margin added around the fleet extent in FOCUSED mode.
pub const FOCUS_SCALE: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    /// Not ticking
    Off,
    Playing,
    /// Ticking, timestamp frozen
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Ignored,
    /// Replay stopped; the controller may keep a restart button when true
    Stopped { restart_available: bool },
}

#[derive(Debug)]
pub struct AnimationClock {
    fleet: FleetRegistry,
    speed: SpeedControl,
    race_start: i64,
    tick_base_ms: u64,
    timestamp: i64,
    state: ClockState,
    display_mode: DisplayMode,
    teams: Vec<String>,
}

impl AnimationClock {
    pub fn new(race_start: i64, tick_base_ms: u64) -> Self {
        Self {
            fleet: FleetRegistry::new(),
            speed: SpeedControl::new(),
            race_start,
            tick_base_ms,
            timestamp: race_start,
            state: ClockState::Off,
            display_mode: DisplayMode::default(),
            teams: Vec::new(),
        }
    }

    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub fn fleet(&self) -> &FleetRegistry {
        &self.fleet
    }

    pub fn speed(&self) -> &SpeedControl {
        &self.speed
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn race_start(&self) -> i64 {
        self.race_start
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_ticking(&self) -> bool {
        self.state != ClockState::Off
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn loaded_teams(&self) -> &[String] {
        &self.teams
    }

    // ── Playback ──────────────────────────────────────────────────────────────

    /// Start or resume. A no-op while already playing.
    pub fn play(&mut self) {
        if self.state == ClockState::Playing {
            return;
        }
        if self.state == ClockState::Off && !self.fleet.is_paused() {
            // fresh run, not a resume
            self.fleet.erase_enabled();
        }
        self.fleet.set_paused(false);
        self.state = ClockState::Playing;
        info!("▶ Replay playing at ×{} from {}", self.speed.value(), self.timestamp);
    }

    pub fn pause(&mut self) {
        self.fleet.set_paused(true);
        if self.state == ClockState::Playing {
            self.state = ClockState::Paused;
        }
        info!("⏸ Replay paused at {}", self.timestamp);
    }

    /// Stop ticking, wipe the drawing and rewind to race start.
    pub fn reset(&mut self) {
        self.state = ClockState::Off;
        self.fleet.erase_enabled();
        self.timestamp = self.race_start;
        self.fleet.reset();
    }

    pub fn restart(&mut self) {
        info!("↺ Replay restarted");
        self.reset();
        self.play();
    }

    /// Returns whether a restart makes sense (fleet not empty).
    pub fn stop(&mut self) -> bool {
        self.speed.reset();
        self.reset();
        info!("⏹ Replay stopped");
        self.fleet.size() > 0
    }

    pub fn increase_speed(&mut self) -> f64 {
        let value = self.speed.increase();
        info!("⚡ Replay speed ×{value}");
        value
    }

    pub fn decrease_speed(&mut self) -> f64 {
        let value = self.speed.decrease();
        info!("⚡ Replay speed ×{value}");
        value
    }

    pub fn select_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
        info!("🎥 Display mode {mode:?}");
    }

    // ── Tick ──────────────────────────────────────────────────────────────────

    /// Advance the replay by one frame. None while OFF.
    pub fn tick(&mut self) -> Option<ReplayFrame> {
        if self.state == ClockState::Off {
            return None;
        }

        let timestamp = self.timestamp;
        let moved = self.fleet.advance(timestamp);
        let camera = if moved { self.camera() } else { None };
        let boats = self.fleet.frames();
        let paused = self.fleet.is_paused();

        if !paused {
            self.timestamp += self.speed.ms_per_tick(self.tick_base_ms);
        }

        let finished = !self.fleet.is_sailing() && self.fleet.size() > 0;
        if finished {
            info!("🏁 All boats home at {timestamp}, rewinding to race start");
            self.timestamp = self.race_start;
            self.fleet.reset();
            self.state = ClockState::Off;
        } else {
            debug!(
                "tick ts={timestamp} visible={} sailing={}",
                boats.len(),
                self.fleet.is_sailing()
            );
        }

        Some(ReplayFrame {
            timestamp,
            speed: self.speed.value(),
            paused,
            finished,
            boats,
            camera,
        })
    }

    fn camera(&self) -> Option<CameraFrame> {
        match self.display_mode {
            DisplayMode::None => None,
            DisplayMode::Centered => self.fleet.center_coordinates().map(|center| CameraFrame {
                mode: DisplayMode::Centered,
                center,
                extent: None,
            }),
            DisplayMode::Focused => self.fleet.extent().map(|extent| CameraFrame {
                mode: DisplayMode::Focused,
                center: extent.center(),
                extent: Some(extent.scale(FOCUS_SCALE)),
            }),
        }
    }

    // ── Team and boat selection ───────────────────────────────────────────────

    /// Add a loaded team. `single` replaces whatever was loaded before.
    /// Returns false if the team was already loaded (multi-selection).
    pub fn load_team(&mut self, team_id: &str, boats: Vec<BoatState>, single: bool) -> bool {
        if single {
            self.reset();
            self.fleet.clear();
            self.teams.clear();
        } else if self.teams.iter().any(|t| t == team_id) {
            return false;
        }
        let count = boats.len();
        for boat in boats {
            self.fleet.add_boat(boat);
        }
        self.teams.push(team_id.to_string());
        info!("⛵ Team '{team_id}' loaded ({count} boats, fleet of {})", self.fleet.total());
        true
    }

    pub fn unload_team(&mut self, team_id: &str) -> bool {
        let Some(idx) = self.teams.iter().position(|t| t == team_id) else {
            return false;
        };
        self.teams.remove(idx);
        let removed = self.fleet.remove_team(team_id);
        self.fleet.erase_disabled();
        info!("Team '{team_id}' unloaded ({removed} boats)");
        true
    }

    /// Enable `name`; with `single`, also hide the disabled boats. Nothing
    /// changes when `name` was not disabled.
    pub fn select_boat(&mut self, name: &str, single: bool) -> bool {
        if !self.fleet.enable_by_name(name) {
            return false;
        }
        if single {
            self.fleet.hide_disabled();
        }
        true
    }

    pub fn deselect_boat(&mut self, name: &str) -> bool {
        let moved = self.fleet.disable_by_name(name);
        self.fleet.hide_disabled();
        moved
    }

    /// Route a control command. `LoadTeam` needs trace data and is handled
    /// by the caller through `load_team`.
    pub fn apply(&mut self, cmd: ControlCommand) -> CommandOutcome {
        match cmd {
            ControlCommand::Play => self.play(),
            ControlCommand::Pause => self.pause(),
            ControlCommand::IncreaseSpeed => {
                self.increase_speed();
            }
            ControlCommand::DecreaseSpeed => {
                self.decrease_speed();
            }
            ControlCommand::Restart => self.restart(),
            ControlCommand::Stop => {
                let restart_available = self.stop();
                return CommandOutcome::Stopped { restart_available };
            }
            ControlCommand::SelectBoat { name, single } => {
                if !self.select_boat(&name, single) {
                    return CommandOutcome::Ignored;
                }
            }
            ControlCommand::DeselectBoat { name } => {
                if !self.deselect_boat(&name) {
                    return CommandOutcome::Ignored;
                }
            }
            ControlCommand::DisableAllBoats => self.fleet.disable_all(),
            ControlCommand::EnableAllBoats => self.fleet.enable_all(),
            ControlCommand::SelectDisplayMode { mode } => self.select_display_mode(mode),
            ControlCommand::UnloadTeam { id } => {
                if !self.unload_team(&id) {
                    return CommandOutcome::Ignored;
                }
            }
            ControlCommand::LoadTeam { id, .. } => {
                warn!("load_team '{id}' reached the clock without trace data");
                return CommandOutcome::Ignored;
            }
        }
        CommandOutcome::Applied
    }
}
