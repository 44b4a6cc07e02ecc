//! loader.rs — Team list and trace file ingestion
//!
//! Layout under the data directory:
//!   <team_list>.json     [{ "id": "...", "name": "..." }, ...]
//!   teams/<team_id>.json [{ "name", "color", "trace": [{ "ts", "lon", "lat" }] }, ...]
//!
//! Traces are validated here, once; a bad boat is logged and skipped so the
//! rest of its team still loads.

use std::path::{Path, PathBuf};

use race_types::{BoatRecord, TeamInfo};
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{info, warn};

use crate::boat::BoatState;
use crate::error::{ReplayError, Result};

/// `<data_dir>/teams/<team_id>.json`. Ids come from the control panel, so
/// anything that could leave `teams/` is rejected.
pub fn team_path(data_dir: &Path, team_id: &str) -> Result<PathBuf> {
    if team_id.is_empty() || team_id.contains(['/', '\\']) || team_id.contains("..") {
        return Err(ReplayError::InvalidTeamId { id: team_id.to_string() });
    }
    Ok(data_dir.join("teams").join(format!("{team_id}.json")))
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| ReplayError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&raw)
        .map_err(|source| ReplayError::Json { path: path.to_path_buf(), source })
}

/// Teams sorted by display name.
pub async fn load_team_list(path: &Path) -> Result<Vec<TeamInfo>> {
    let mut teams: Vec<TeamInfo> = read_json(path).await?;
    teams.sort_by(|a, b| a.name.cmp(&b.name));
    info!("Loaded team list {} ({} teams)", path.display(), teams.len());
    Ok(teams)
}

/// Boats of one team, sorted by name, each tagged with `team_id`.
pub async fn load_team(data_dir: &Path, team_id: &str) -> Result<Vec<BoatState>> {
    let path = team_path(data_dir, team_id)?;
    let records: Vec<BoatRecord> = read_json(&path).await?;
    Ok(build_boats(records, team_id))
}

pub fn build_boats(mut records: Vec<BoatRecord>, team_id: &str) -> Vec<BoatState> {
    records.sort_by(|a, b| a.name.cmp(&b.name));
    records
        .into_iter()
        .filter_map(|record| match BoatState::from_record(record, team_id) {
            Ok(boat) => Some(boat),
            Err(e) => {
                warn!("Skipping boat in team '{team_id}': {e}");
                None
            }
        })
        .collect()
}
