//! Walls, directions, positions and cell snapshots

use std::fmt;

use crate::error::{MazeError, Result};

/// The state of a wall
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wall {
    /// Passable
    Open = 0,
    /// Impassable, but an architect may carve it open
    Closed = 1,
    /// Outer boundary; never carved
    Solid = 2,
}

impl Wall {
    /// Byte stored for this wall in the persisted format
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Wall::Open)
    }
}

impl TryFrom<u8> for Wall {
    type Error = MazeError;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(Wall::Open),
            1 => Ok(Wall::Closed),
            2 => Ok(Wall::Solid),
            _ => Err(MazeError::InvalidStream(format!("invalid wall byte {}", byte))),
        }
    }
}

/// Cardinal directions, in the order used to index a cell's walls
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction for an index in `[0, 4)`
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Direction::North),
            1 => Some(Direction::East),
            2 => Some(Direction::South),
            3 => Some(Direction::West),
            _ => None,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// A zero-based (column, row) coordinate in a maze
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub col: usize,
    pub row: usize,
}

impl Position {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// The adjacent position in `dir`, if it lies inside a `width` x `height` grid
    pub fn step(self, dir: Direction, width: usize, height: usize) -> Option<Position> {
        let (col, row) = match dir {
            Direction::North => (self.col, self.row.checked_sub(1)?),
            Direction::East => (self.col + 1, self.row),
            Direction::South => (self.col, self.row + 1),
            Direction::West => (self.col.checked_sub(1)?, self.row),
        };

        if col < width && row < height {
            Some(Position { col, row })
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Snapshot of the four walls around one cell.
///
/// Returned by value from [`crate::Maze::get_cell`]; changing it has no
/// effect on the maze it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub walls: [Wall; 4],
}

impl Cell {
    pub const fn wall(&self, dir: Direction) -> Wall {
        self.walls[dir.index()]
    }

    pub const fn north(&self) -> Wall {
        self.walls[0]
    }

    pub const fn east(&self) -> Wall {
        self.walls[1]
    }

    pub const fn south(&self) -> Wall {
        self.walls[2]
    }

    pub const fn west(&self) -> Wall {
        self.walls[3]
    }

    /// Number of open walls around the cell
    pub fn open_count(&self) -> usize {
        self.walls.iter().filter(|w| w.is_open()).count()
    }
}
