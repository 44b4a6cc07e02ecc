//! config.rs — `config.toml` structures
//!
//! Sections: `[race]`, `[animation]`, `[data]`, `[server]`. A missing file
//! falls back to the copy embedded at build time.

use std::path::{Path, PathBuf};

use chrono::DateTime;
use race_types::DisplayMode;
use serde::Deserialize;
use tracing::info;

use crate::clock::AnimationClock;
use crate::error::{ReplayError, Result};

pub const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayConfig {
    pub race: RaceConfig,
    pub animation: AnimationConfig,
    pub data: DataConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RaceConfig {
    /// RFC 3339 instant the virtual clock starts (and rewinds) at
    pub start: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    pub tick_rate_hz: f64,
    pub tick_base_ms: u64,
    #[serde(default)]
    pub display_mode: DisplayMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub team_list: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub ctrl_port: u16,
}

impl ReplayConfig {
    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Read `path`, or the embedded default when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No {} found, using built-in config", path.display());
                Self::from_toml(DEFAULT_CONFIG)
            }
            Err(source) => Err(ReplayError::Io { path: path.to_path_buf(), source }),
        }
    }

    /// Race start in ms since epoch.
    pub fn race_start_ms(&self) -> Result<i64> {
        DateTime::parse_from_rfc3339(&self.race.start)
            .map(|dt| dt.timestamp_millis())
            .map_err(|source| ReplayError::RaceStart { value: self.race.start.clone(), source })
    }

    pub fn team_list_path(&self) -> PathBuf {
        self.data.dir.join(format!("{}.json", self.data.team_list))
    }

    pub fn tick_interval_ms(&self) -> u64 {
        (1000.0 / self.animation.tick_rate_hz.max(1.0)) as u64
    }

    pub fn build_clock(&self) -> Result<AnimationClock> {
        Ok(AnimationClock::new(self.race_start_ms()?, self.animation.tick_base_ms)
            .with_display_mode(self.animation.display_mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let cfg = ReplayConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(cfg.animation.tick_base_ms, 100_000);
        assert_eq!(cfg.animation.display_mode, DisplayMode::Focused);
        assert_eq!(cfg.team_list_path(), Path::new("data").join("defaultTeamList.json"));
        assert_eq!(cfg.tick_interval_ms(), 33);
    }

    #[test]
    fn test_race_start_ms() {
        let cfg = ReplayConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(cfg.race_start_ms().unwrap(), 1_731_240_000_000);

        let clock = cfg.build_clock().unwrap();
        assert_eq!(clock.timestamp(), 1_731_240_000_000);
    }

    #[test]
    fn test_bad_race_start() {
        let raw = DEFAULT_CONFIG.replace("2024-11-10T12:00:00Z", "next sunday");
        let cfg = ReplayConfig::from_toml(&raw).unwrap();
        assert!(matches!(cfg.race_start_ms(), Err(ReplayError::RaceStart { .. })));
    }

    #[test]
    fn test_display_mode_defaults_when_absent() {
        let raw = DEFAULT_CONFIG.replace("display_mode = \"FOCUSED\"", "");
        let cfg = ReplayConfig::from_toml(&raw).unwrap();
        assert_eq!(cfg.animation.display_mode, DisplayMode::Focused);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let cfg = ReplayConfig::load(Path::new("/nonexistent/race-replay.toml")).unwrap();
        assert_eq!(cfg.server.ctrl_port, 9191);
    }
}
