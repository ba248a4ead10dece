//! Pluggable maze carving strategies
//!
//! An [`Architect`] never sees a maze's storage. It works through a
//! [`FloorPlan`], which exposes only what carving needs: dimensions, wall
//! queries, opening closed walls, opening boundary walls, and recording the
//! entrance and exit.

use crate::error::Result;
use crate::grid::Maze;
use crate::rng::RandomSource;
use crate::wall::{Direction, Position, Wall};

/// A strategy that carves passages into a freshly created maze.
///
/// Architects hold no per-maze state; the same architect can be run over
/// any number of mazes.
pub trait Architect {
    /// Carve the maze behind `plan`, drawing randomness from `rng`.
    fn create_floor_plan(
        &mut self,
        plan: &mut FloorPlan<'_>,
        rng: &mut dyn RandomSource,
    ) -> Result<()>;
}

/// Carving access to a maze for the duration of one architect run
pub struct FloorPlan<'a> {
    maze: &'a mut Maze,
}

impl<'a> FloorPlan<'a> {
    pub fn new(maze: &'a mut Maze) -> Self {
        Self { maze }
    }

    pub fn width(&self) -> usize {
        self.maze.width()
    }

    pub fn height(&self) -> usize {
        self.maze.height()
    }

    pub fn wall(&self, pos: Position, dir: Direction) -> Result<Wall> {
        self.maze.wall(pos, dir)
    }

    /// Neighbour of `pos` in `dir`, `None` across the boundary
    pub fn neighbor(&self, pos: Position, dir: Direction) -> Option<Position> {
        pos.step(dir, self.maze.width(), self.maze.height())
    }

    /// Open the closed wall on the `dir` side of `pos`.
    ///
    /// Returns `false` and leaves the wall alone unless it is [`Wall::Closed`].
    pub fn carve(&mut self, pos: Position, dir: Direction) -> Result<bool> {
        if self.maze.wall(pos, dir)? != Wall::Closed {
            return Ok(false);
        }
        self.maze.set_wall(pos, dir, Wall::Open)?;
        Ok(true)
    }

    /// Open the boundary wall on the `dir` side of `pos`.
    ///
    /// Returns `false` and changes nothing when that side is not on the
    /// maze's outer edge.
    pub fn open_boundary(&mut self, pos: Position, dir: Direction) -> Result<bool> {
        // Validates pos before the boundary test
        self.maze.wall(pos, dir)?;
        if !self.maze.is_boundary(pos, dir) {
            return Ok(false);
        }
        self.maze.set_wall(pos, dir, Wall::Open)?;
        Ok(true)
    }

    pub fn set_entrance(&mut self, pos: Position) {
        self.maze.set_entrance(Some(pos));
    }

    pub fn set_exit(&mut self, pos: Position) {
        self.maze.set_exit(Some(pos));
    }

    pub fn entrance(&self) -> Option<Position> {
        self.maze.entrance()
    }

    pub fn exit(&self) -> Option<Position> {
        self.maze.exit()
    }
}

impl Maze {
    /// Create a `width` x `height` maze and let `architect` carve it.
    ///
    /// # Errors
    /// [`crate::MazeError::InvalidDimensions`] for dimensions below 2; anything
    /// the architect returns.
    ///
    /// # Example
    /// ```
    /// use maze_core::{Maze, RecursiveBacktracker, SimpleLCG};
    ///
    /// let mut architect = RecursiveBacktracker::new();
    /// let mut rng = SimpleLCG::new(12345);
    /// let maze = Maze::generate(10, 8, &mut architect, &mut rng).unwrap();
    /// assert_eq!(maze.open_interior_walls(), 10 * 8 - 1);
    /// ```
    pub fn generate(
        width: usize,
        height: usize,
        architect: &mut dyn Architect,
        rng: &mut dyn RandomSource,
    ) -> Result<Self> {
        let mut maze = Maze::create(width, height)?;
        maze.run_architect(architect, rng)?;
        Ok(maze)
    }

    /// Run `architect` over this maze
    pub fn run_architect(
        &mut self,
        architect: &mut dyn Architect,
        rng: &mut dyn RandomSource,
    ) -> Result<()> {
        let mut plan = FloorPlan::new(self);
        architect.create_floor_plan(&mut plan, rng)
    }
}
