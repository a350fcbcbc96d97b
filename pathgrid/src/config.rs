use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{error::Result, grid::Point};

/// Dimensions and fixed markers of the grid, plus the replay timing.
///
/// Every field falls back to its default when missing from a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old files
pub struct GridConfig {
    pub rows: usize,
    pub columns: usize,
    pub start: Point,
    pub finish: Point,
    pub animation: AnimationConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            columns: 50,
            start: Point { row: 10, col: 15 },
            finish: Point { row: 10, col: 35 },
            animation: AnimationConfig::default(),
        }
    }
}

impl GridConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_json(&fs::read_to_string(path)?)?;
        log::debug!(
            "loaded {}x{} grid configuration from {}",
            config.rows,
            config.columns,
            path.display()
        );
        Ok(config)
    }
}

/// Delay between two consecutive reveals, per animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub visited_step_ms: u64,
    pub path_step_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            visited_step_ms: 10,
            path_step_ms: 50,
        }
    }
}

impl AnimationConfig {
    pub fn visited_step(&self) -> Duration {
        Duration::from_millis(self.visited_step_ms)
    }

    pub fn path_step(&self) -> Duration {
        Duration::from_millis(self.path_step_ms)
    }
}
