use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    events::RandomEvent,
    state::{GardenState, Plant},
    upgrades::Upgrade,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Ticks between snapshot files; 0 disables them.
    #[serde(default)]
    pub interval_ticks: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("snapshots")
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            interval_ticks: 0,
            output_dir: default_output_dir(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub name: String,
    pub tick: u64,
    pub day: u32,
    pub water: f64,
    pub nutrients: f64,
    pub energy: f64,
    pub oxygen: u32,
    pub credits: u32,
    pub research_points: u32,
    pub temperature: f64,
    pub gravity: f64,
    pub plants: Vec<Plant>,
    pub upgrades: Vec<Upgrade>,
    pub oxygen_warning: bool,
    pub game_over: bool,
    pub last_event: Option<RandomEvent>,
}

impl SessionSnapshot {
    pub fn capture(
        name: &str,
        tick: u64,
        state: &GardenState,
        last_event: Option<&RandomEvent>,
    ) -> Self {
        Self {
            name: name.to_string(),
            tick,
            day: state.day(),
            water: state.water(),
            nutrients: state.nutrients(),
            energy: state.energy(),
            oxygen: state.oxygen(),
            credits: state.credits(),
            research_points: state.research_points(),
            temperature: state.temperature(),
            gravity: state.environment().gravity,
            plants: state.plants().to_vec(),
            upgrades: state.upgrades().unlocked().collect(),
            oxygen_warning: state.oxygen_warning(),
            game_over: state.is_game_over(),
            last_event: last_event.copied(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Writes `<output_dir>/<name>/tick_NNNNNN.json` every `interval_ticks`.
pub struct SnapshotWriter {
    output_dir: PathBuf,
    interval_ticks: u64,
}

impl SnapshotWriter {
    pub fn new(config: &SnapshotConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            interval_ticks: config.interval_ticks,
        }
    }

    pub fn should_write(&self, tick: u64) -> bool {
        self.interval_ticks != 0 && tick > 0 && tick % self.interval_ticks == 0
    }

    pub fn maybe_write(
        &self,
        tick: u64,
        snapshot: &SessionSnapshot,
    ) -> Result<Option<PathBuf>, SnapshotError> {
        if !self.should_write(tick) {
            return Ok(None);
        }
        self.write(snapshot).map(Some)
    }

    pub fn write(&self, snapshot: &SessionSnapshot) -> Result<PathBuf, SnapshotError> {
        let dir = self.output_dir.join(&snapshot.name);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("tick_{:06}.json", snapshot.tick));
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
