//! # race-replay
//!
//! Replays a multi-boat ocean race from recorded GPS traces.
//!
//! Each boat's sparse trace is interpolated into a continuous position over
//! a virtual clock (`track`), accumulated into an antimeridian-safe trail
//! (`trail`), and the whole fleet is driven tick by tick by the animation
//! clock (`clock`). Ingestion (`loader`) and configuration (`config`) sit
//! around that core; the `race-replay` binary adds the tick task and the
//! WebSocket control panel.

pub mod antimeridian;
pub mod boat;
pub mod clock;
pub mod config;
pub mod error;
pub mod fleet;
pub mod loader;
pub mod speed;
pub mod track;
pub mod trail;

pub use boat::BoatState;
pub use clock::{AnimationClock, ClockState, CommandOutcome};
pub use config::ReplayConfig;
pub use error::{ReplayError, Result};
pub use fleet::FleetRegistry;
pub use speed::SpeedControl;
pub use track::TrackInterpolator;
pub use trail::TrailBuilder;
