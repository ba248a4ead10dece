//! The maze grid and its shared-wall storage
//!
//! Every wall is stored exactly once in an arena owned by the [`Maze`].
//! A cell is a table of four [`WallId`]s into that arena; two neighbouring
//! cells hold the same id for the edge between them, so a change made
//! through one cell is seen through the other.
//!
//! Arena layout (also the order walls are persisted in):
//! - horizontal walls, column by column: for column `c`, the north walls of
//!   rows `0..height`, then the south wall of the last row;
//! - vertical walls, row by row: for row `r`, the west walls of columns
//!   `0..width`, then the east wall of the last column.

use std::fmt;

use crate::error::{MazeError, Result};
use crate::wall::{Cell, Direction, Position, Wall};
use crate::MIN_DIMENSION;

/// Stable index of a wall in a maze's wall arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WallId(usize);

impl WallId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A rectangular maze of `width` x `height` cells.
///
/// `Clone` copies wall values into a fresh arena; the clone shares nothing
/// with its source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    entrance: Option<Position>,
    exit: Option<Position>,
    walls: Vec<Wall>,
    /// Wall ids per cell, column-major (`col * height + row`), indexed by [`Direction`]
    cells: Vec<[WallId; 4]>,
}

impl Maze {
    /// Create a maze with every interior wall closed and every boundary wall solid.
    ///
    /// Entrance and exit stay unset until an architect runs.
    ///
    /// # Errors
    /// [`MazeError::InvalidDimensions`] if either dimension is below 2, or if
    /// the wall count would overflow `usize`.
    pub fn create(width: usize, height: usize) -> Result<Self> {
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(MazeError::InvalidDimensions { width, height });
        }

        let wall_count = Self::wall_count_for(width, height)
            .ok_or(MazeError::InvalidDimensions { width, height })?;

        let horizontal = width * (height + 1);
        let mut walls = Vec::with_capacity(wall_count);

        for _col in 0..width {
            walls.push(Wall::Solid);
            walls.extend(std::iter::repeat(Wall::Closed).take(height - 1));
            walls.push(Wall::Solid);
        }
        for _row in 0..height {
            walls.push(Wall::Solid);
            walls.extend(std::iter::repeat(Wall::Closed).take(width - 1));
            walls.push(Wall::Solid);
        }
        debug_assert_eq!(walls.len(), wall_count);

        let mut cells = Vec::with_capacity(width * height);
        for col in 0..width {
            for row in 0..height {
                let north = col * (height + 1) + row;
                let west = horizontal + row * (width + 1) + col;
                cells.push([
                    WallId(north),
                    WallId(west + 1),
                    WallId(north + 1),
                    WallId(west),
                ]);
            }
        }

        Ok(Self {
            width,
            height,
            entrance: None,
            exit: None,
            walls,
            cells,
        })
    }

    /// Number of walls in a `width` x `height` maze, `None` on overflow
    pub(crate) fn wall_count_for(width: usize, height: usize) -> Option<usize> {
        let horizontal = width.checked_mul(height.checked_add(1)?)?;
        let vertical = height.checked_mul(width.checked_add(1)?)?;
        horizontal.checked_add(vertical)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Entrance cell, `None` until an architect has run
    pub fn entrance(&self) -> Option<Position> {
        self.entrance
    }

    /// Exit cell, `None` until an architect has run
    pub fn exit(&self) -> Option<Position> {
        self.exit
    }

    /// Snapshot of the walls around the cell at (`col`, `row`)
    pub fn get_cell(&self, col: usize, row: usize) -> Result<Cell> {
        let ids = self.cell_ids(Position::new(col, row))?;
        Ok(Cell {
            walls: ids.map(|id| self.walls[id.0]),
        })
    }

    /// State of the wall on the `dir` side of `pos`
    pub fn wall(&self, pos: Position, dir: Direction) -> Result<Wall> {
        let id = self.wall_id(pos, dir)?;
        Ok(self.walls[id.0])
    }

    /// Id of the wall on the `dir` side of `pos`
    pub fn wall_id(&self, pos: Position, dir: Direction) -> Result<WallId> {
        Ok(self.cell_ids(pos)?[dir.index()])
    }

    /// Whether the `dir` side of `pos` faces outside the maze
    pub fn is_boundary(&self, pos: Position, dir: Direction) -> bool {
        pos.step(dir, self.width, self.height).is_none()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.col < self.width && pos.row < self.height
    }

    /// Number of open walls between two cells (boundary openings excluded)
    pub fn open_interior_walls(&self) -> usize {
        let mut open = 0;
        for col in 0..self.width {
            for row in 0..self.height {
                let ids = self.cells[col * self.height + row];
                // Count each shared wall once, from its east and south owners.
                if col + 1 < self.width && self.walls[ids[Direction::East.index()].0].is_open() {
                    open += 1;
                }
                if row + 1 < self.height && self.walls[ids[Direction::South.index()].0].is_open() {
                    open += 1;
                }
            }
        }
        open
    }

    /// Convert the maze to a binary grid (`0` = wall, `1` = walkable).
    ///
    /// For a maze of W columns and H rows the grid has `H*2 + 1` rows of
    /// `W*2 + 1` entries. Cell centres sit at `(row*2 + 1, col*2 + 1)`; the
    /// entries between centres are `1` when the wall there is open, including
    /// the boundary openings at the entrance and exit.
    pub fn to_binary_grid(&self) -> Vec<Vec<u8>> {
        let mut grid = vec![vec![0u8; self.width * 2 + 1]; self.height * 2 + 1];

        for col in 0..self.width {
            for row in 0..self.height {
                let ids = self.cells[col * self.height + row];
                let open = |dir: Direction| self.walls[ids[dir.index()].0].is_open();

                let gr = row * 2 + 1;
                let gc = col * 2 + 1;

                grid[gr][gc] = 1;

                if open(Direction::North) {
                    grid[gr - 1][gc] = 1;
                }
                if open(Direction::South) {
                    grid[gr + 1][gc] = 1;
                }
                if open(Direction::East) {
                    grid[gr][gc + 1] = 1;
                }
                if open(Direction::West) {
                    grid[gr][gc - 1] = 1;
                }
            }
        }

        grid
    }

    fn cell_ids(&self, pos: Position) -> Result<&[WallId; 4]> {
        if !self.contains(pos) {
            return Err(MazeError::OutOfBounds {
                col: pos.col,
                row: pos.row,
            });
        }
        Ok(&self.cells[pos.col * self.height + pos.row])
    }

    pub(crate) fn set_wall(&mut self, pos: Position, dir: Direction, state: Wall) -> Result<()> {
        let id = self.wall_id(pos, dir)?;
        self.walls[id.0] = state;
        Ok(())
    }

    pub(crate) fn set_entrance(&mut self, pos: Option<Position>) {
        self.entrance = pos;
    }

    pub(crate) fn set_exit(&mut self, pos: Option<Position>) {
        self.exit = pos;
    }

    /// The wall arena, in persisted order
    pub(crate) fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub(crate) fn walls_mut(&mut self) -> &mut [Wall] {
        &mut self.walls
    }
}

impl fmt::Display for Maze {
    /// ASCII view: `+` at corners, `---` and `|` for walls that are not open.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wall_at = |col: usize, row: usize, dir: Direction| {
            self.walls[self.cells[col * self.height + row][dir.index()].0]
        };
        let span = |wall: Wall| if wall.is_open() { "   " } else { "---" };
        let side = |wall: Wall| if wall.is_open() { ' ' } else { '|' };

        for row in 0..self.height {
            for col in 0..self.width {
                write!(f, "+{}", span(wall_at(col, row, Direction::North)))?;
            }
            writeln!(f, "+")?;

            for col in 0..self.width {
                write!(f, "{}   ", side(wall_at(col, row, Direction::West)))?;
            }
            writeln!(f, "{}", side(wall_at(self.width - 1, row, Direction::East)))?;
        }

        for col in 0..self.width {
            write!(f, "+{}", span(wall_at(col, self.height - 1, Direction::South)))?;
        }
        writeln!(f, "+")
    }
}
