//! Error type shared by every maze operation

use thiserror::Error;

/// Failures raised by maze creation, queries, persistence and rendering.
///
/// Every variant is local and deterministic: repeating the call with the same
/// inputs fails the same way. A failed operation never leaves a partially
/// built maze behind.
#[derive(Debug, Error)]
pub enum MazeError {
    /// Width or height below the minimum of 2 cells.
    #[error("maze width and height must both be at least 2 (got {width}x{height})")]
    InvalidDimensions { width: usize, height: usize },

    /// Cell coordinate outside the maze.
    #[error("cell coordinate ({col}, {row}) is outside the maze")]
    OutOfBounds { col: usize, row: usize },

    /// A persisted stream could not be read or written, or holds invalid data.
    #[error("invalid maze stream: {0}")]
    InvalidStream(String),

    /// Render scale below the minimum of 2 pixels per cell.
    #[error("grid size must be 2 or greater (got {0})")]
    InvalidGridSize(usize),

    /// Failure reported by an image encoder or other I/O collaborator.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MazeError>;
