//! Generation settings, loadable from JSON and overridable from the CLI

use std::fs;
use std::path::{Path, PathBuf};

use maze_core::{ExitPlacement, MIN_DIMENSION, MIN_GRID_SIZE};
use serde::{Deserialize, Serialize};

/// Where the exit is placed relative to the entrance edge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExitEdge {
    /// Same edge as the entrance
    #[default]
    Same,
    /// Edge opposite the entrance
    Opposite,
}

impl std::str::FromStr for ExitEdge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "same" => Ok(ExitEdge::Same),
            "opposite" => Ok(ExitEdge::Opposite),
            _ => Err(format!("Invalid exit edge: '{}'. Must be 'same' or 'opposite'", s)),
        }
    }
}

impl std::fmt::Display for ExitEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitEdge::Same => write!(f, "same"),
            ExitEdge::Opposite => write!(f, "opposite"),
        }
    }
}

impl From<ExitEdge> for ExitPlacement {
    fn from(edge: ExitEdge) -> Self {
        match edge {
            ExitEdge::Same => ExitPlacement::SameEdge,
            ExitEdge::Opposite => ExitPlacement::OppositeEdge,
        }
    }
}

/// Settings for one generate-render-save run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MazeConfig {
    /// Maze width in cells
    pub width: usize,
    /// Maze height in cells
    pub height: usize,
    /// Pixels per cell in the rendered image
    pub grid_size: usize,
    /// Seed for the deterministic generator; `None` draws from the thread RNG
    pub seed: Option<u32>,
    pub exit_edge: ExitEdge,
    /// PNG output
    pub image_path: PathBuf,
    /// Binary maze output
    pub data_path: PathBuf,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 30,
            grid_size: 11,
            seed: None,
            exit_edge: ExitEdge::Same,
            image_path: PathBuf::from("maze.png"),
            data_path: PathBuf::from("maze.png.maze"),
        }
    }
}

impl MazeConfig {
    /// Load settings from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path.as_ref())?;
        let config: MazeConfig = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Reject settings the maze core would refuse, before any work starts
    pub fn validate(&self) -> Result<(), String> {
        if self.width < MIN_DIMENSION || self.height < MIN_DIMENSION {
            return Err(format!(
                "Maze must be at least {}x{} cells (got {}x{})",
                MIN_DIMENSION, MIN_DIMENSION, self.width, self.height
            ));
        }
        if self.grid_size < MIN_GRID_SIZE {
            return Err(format!(
                "Grid size must be at least {} pixels (got {})",
                MIN_GRID_SIZE, self.grid_size
            ));
        }
        Ok(())
    }
}
