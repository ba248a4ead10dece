use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use maze_core::{
    Maze, MazeError, Position, RandomSource, RecursiveBacktracker, RngSource, SimpleLCG,
};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod encoder;

pub use config::{ExitEdge, MazeConfig};
pub use encoder::PngEncoder;

/// A cell coordinate as written in JSON summaries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellRef {
    pub col: usize,
    pub row: usize,
}

impl From<Position> for CellRef {
    fn from(pos: Position) -> Self {
        CellRef {
            col: pos.col,
            row: pos.row,
        }
    }
}

/// Description of a maze for display or JSON output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MazeSummary {
    pub width: usize,
    pub height: usize,
    /// `None` for a maze no architect has carved
    pub entrance: Option<CellRef>,
    pub exit: Option<CellRef>,
    /// Open walls between cells; `width * height - 1` for a perfect maze
    pub open_passages: usize,
    /// Seed the maze was generated from, when known
    pub seed: Option<u32>,
}

impl MazeSummary {
    pub fn of(maze: &Maze, seed: Option<u32>) -> Self {
        MazeSummary {
            width: maze.width(),
            height: maze.height(),
            entrance: maze.entrance().map(CellRef::from),
            exit: maze.exit().map(CellRef::from),
            open_passages: maze.open_interior_walls(),
            seed,
        }
    }
}

/// Generate a maze with the recursive backtracker.
///
/// With a seed the maze comes from [`SimpleLCG`] and is reproducible;
/// without one it draws from the thread-local `rand` generator.
///
/// # Example
/// ```
/// use host::{generate_maze, ExitEdge};
///
/// let maze = generate_maze(8, 6, Some(2918957128), ExitEdge::Same).unwrap();
/// assert_eq!(maze.open_interior_walls(), 47);
/// ```
pub fn generate_maze(
    width: usize,
    height: usize,
    seed: Option<u32>,
    exit_edge: ExitEdge,
) -> Result<Maze, Box<dyn std::error::Error>> {
    tracing::info!(
        "Generating {}x{} maze (seed: {:?}, exit edge: {})",
        width,
        height,
        seed,
        exit_edge
    );

    let mut architect = RecursiveBacktracker::with_exit_placement(exit_edge.into());
    let mut lcg;
    let mut thread_rng;
    let rng: &mut dyn RandomSource = match seed {
        Some(seed) => {
            lcg = SimpleLCG::new(seed);
            &mut lcg
        }
        None => {
            thread_rng = RngSource::thread();
            &mut thread_rng
        }
    };

    let maze = Maze::generate(width, height, &mut architect, rng)?;
    tracing::info!("Maze generated: entrance {:?}, exit {:?}", maze.entrance(), maze.exit());
    Ok(maze)
}

/// Save a maze to a binary file.
///
/// An uncreatable destination is reported as [`MazeError::InvalidStream`].
pub fn save_maze_file(
    maze: &Maze,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        MazeError::InvalidStream(format!("cannot create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    maze.save(&mut writer)?;
    tracing::info!("Saved maze data to {}", path.display());
    Ok(())
}

/// Load a maze from a binary file written by [`save_maze_file`].
///
/// An unopenable source is reported as [`MazeError::InvalidStream`].
pub fn load_maze_file(path: impl AsRef<Path>) -> Result<Maze, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        MazeError::InvalidStream(format!("cannot open {}: {}", path.display(), e))
    })?;
    let mut reader = BufReader::new(file);
    let maze = Maze::load(&mut reader)?;
    tracing::info!("Loaded {}x{} maze from {}", maze.width(), maze.height(), path.display());
    Ok(maze)
}

/// Render a maze to a PNG file
pub fn render_maze_png(
    maze: &Maze,
    path: impl AsRef<Path>,
    grid_size: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut encoder = PngEncoder::new(path.as_ref());
    maze_core::render_to(maze, grid_size, &mut encoder)?;
    Ok(())
}

/// Run the full pipeline for `config`: generate, render the PNG, save the data.
///
/// # Returns
/// The generated maze and its summary.
pub fn run_generate(
    config: &MazeConfig,
) -> Result<(Maze, MazeSummary), Box<dyn std::error::Error>> {
    config.validate()?;

    let maze = generate_maze(config.width, config.height, config.seed, config.exit_edge)?;
    render_maze_png(&maze, &config.image_path, config.grid_size)?;
    save_maze_file(&maze, &config.data_path)?;

    let summary = MazeSummary::of(&maze, config.seed);
    Ok((maze, summary))
}
