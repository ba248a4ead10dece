//! Grid maze model, generation, persistence and rendering
//!
//! This crate provides the data structures and algorithms shared by the
//! host program: a rectangular lattice of cells whose walls are stored once
//! and shared between neighbours, a pluggable "architect" abstraction that
//! carves passages, a bit-exact binary codec, and a renderer that turns wall
//! state into a packed monochrome bitmap.
//!
//! The crate performs no file-system access. Random numbers and image
//! encoding are supplied by the caller through [`RandomSource`] and
//! [`ImageEncoder`].

pub mod architect;
pub mod error;
pub mod grid;
pub mod maze_gen;
pub mod persist;
pub mod render;
pub mod rng;
pub mod wall;

// Re-export commonly used types for convenience
pub use architect::{Architect, FloorPlan};
pub use error::{MazeError, Result};
pub use grid::Maze;
pub use maze_gen::{ExitPlacement, RecursiveBacktracker, DIRECTION_ORDERINGS};
pub use render::{render, render_to, Bitmap, ImageEncoder};
pub use rng::{RandomSource, SimpleLCG};
#[cfg(feature = "rand")]
pub use rng::RngSource;
pub use wall::{Cell, Direction, Position, Wall};

/// Smallest width or height a maze may have
pub const MIN_DIMENSION: usize = 2;

/// Smallest pixel size of one cell in a rendered bitmap
pub const MIN_GRID_SIZE: usize = 2;

/// Value stored for both coordinates of an unset entrance or exit
pub const UNSET_COORDINATE: u64 = u64::MAX;
