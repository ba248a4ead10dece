//! Binary save/load for mazes
//!
//! Layout (all size fields are u64 little-endian):
//!
//! | field                          | bytes |
//! |--------------------------------|-------|
//! | width                          | 8     |
//! | height                         | 8     |
//! | entrance col, entrance row     | 16    |
//! | exit col, exit row             | 16    |
//! | wall states, one byte each     | W(H+1) + H(W+1) |
//!
//! Wall bytes come column by column (north walls of rows `0..H`, then the
//! south wall of the last row), then row by row (west walls of columns
//! `0..W`, then the east wall of the last column). Each byte is
//! `Open = 0`, `Closed = 1`, `Solid = 2`. An unset entrance or exit is
//! written as `u64::MAX` for both coordinates.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::error::{MazeError, Result};
use crate::grid::Maze;
use crate::wall::{Direction, Position, Wall};
use crate::{MIN_DIMENSION, UNSET_COORDINATE};

/// Size of the fixed header preceding the wall bytes
pub const HEADER_SIZE: usize = 6 * 8;

fn write_err(e: std::io::Error) -> MazeError {
    MazeError::InvalidStream(format!("write failed: {}", e))
}

fn read_err(e: std::io::Error) -> MazeError {
    MazeError::InvalidStream(format!("read failed: {}", e))
}

fn to_u64(value: usize) -> u64 {
    // usize is at most 64 bits on every supported target
    value as u64
}

fn to_usize(value: u64, what: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        MazeError::InvalidStream(format!("{} {} does not fit in memory", what, value))
    })
}

fn write_position<W: Write>(writer: &mut W, pos: Option<Position>) -> Result<()> {
    let (col, row) = match pos {
        Some(p) => (to_u64(p.col), to_u64(p.row)),
        None => (UNSET_COORDINATE, UNSET_COORDINATE),
    };
    writer.write_u64::<LittleEndian>(col).map_err(write_err)?;
    writer.write_u64::<LittleEndian>(row).map_err(write_err)?;
    Ok(())
}

fn read_position<R: Read>(
    reader: &mut R,
    width: usize,
    height: usize,
    what: &str,
) -> Result<Option<Position>> {
    let col = reader.read_u64::<LittleEndian>().map_err(read_err)?;
    let row = reader.read_u64::<LittleEndian>().map_err(read_err)?;

    if col == UNSET_COORDINATE && row == UNSET_COORDINATE {
        return Ok(None);
    }

    match (usize::try_from(col), usize::try_from(row)) {
        (Ok(col), Ok(row)) if col < width && row < height => Ok(Some(Position::new(col, row))),
        _ => Err(MazeError::InvalidStream(format!(
            "{} ({}, {}) is outside a {}x{} maze",
            what, col, row, width, height
        ))),
    }
}

impl Maze {
    /// Write the maze to `writer` in the binary format described above.
    ///
    /// # Errors
    /// [`MazeError::InvalidStream`] if the writer fails.
    pub fn save<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(to_u64(self.width())).map_err(write_err)?;
        writer.write_u64::<LittleEndian>(to_u64(self.height())).map_err(write_err)?;
        write_position(writer, self.entrance())?;
        write_position(writer, self.exit())?;

        // The wall arena is kept in persisted order
        let bytes: Vec<u8> = self.walls().iter().map(|w| w.as_byte()).collect();
        writer.write_all(&bytes).map_err(write_err)?;
        writer.flush().map_err(write_err)?;

        debug!("Saved {}x{} maze ({} wall bytes)", self.width(), self.height(), bytes.len());
        Ok(())
    }

    /// Read a maze written by [`Maze::save`].
    ///
    /// # Errors
    /// - [`MazeError::InvalidDimensions`] if the stored width or height is below 2
    /// - [`MazeError::InvalidStream`] if the stream is truncated, unreadable, or
    ///   holds an invalid wall byte, an out-of-range entrance/exit, a solid
    ///   interior wall, a closed boundary wall or a boundary opening away from
    ///   the entrance and exit
    pub fn load<R: Read>(reader: &mut R) -> Result<Maze> {
        let width = reader.read_u64::<LittleEndian>().map_err(read_err)?;
        let height = reader.read_u64::<LittleEndian>().map_err(read_err)?;
        let width = to_usize(width, "width")?;
        let height = to_usize(height, "height")?;

        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        let wall_count = Maze::wall_count_for(width, height).ok_or_else(|| {
            MazeError::InvalidStream(format!("{}x{} maze is too large", width, height))
        })?;

        let entrance = read_position(reader, width, height, "entrance")?;
        let exit = read_position(reader, width, height, "exit")?;

        // Read through `take` so a corrupt header cannot force a huge allocation up front
        let mut bytes = Vec::new();
        reader
            .by_ref()
            .take(to_u64(wall_count))
            .read_to_end(&mut bytes)
            .map_err(read_err)?;
        if bytes.len() != wall_count {
            return Err(MazeError::InvalidStream(format!(
                "expected {} wall bytes, found {}",
                wall_count,
                bytes.len()
            )));
        }

        let mut maze = Maze::create(width, height)?;
        for (slot, byte) in maze.walls_mut().iter_mut().zip(bytes) {
            *slot = Wall::try_from(byte)?;
        }
        maze.set_entrance(entrance);
        maze.set_exit(exit);
        maze.check_wall_kinds()?;

        debug!("Loaded {}x{} maze", width, height);
        Ok(maze)
    }

    /// Encode the maze into a new byte vector
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let wall_count = self.walls().len();
        let mut bytes = Vec::with_capacity(HEADER_SIZE + wall_count);
        self.save(&mut bytes)?;
        Ok(bytes)
    }

    /// Decode a maze from a byte slice
    pub fn from_bytes(mut bytes: &[u8]) -> Result<Maze> {
        Maze::load(&mut bytes)
    }

    /// Interior walls must not be solid. Boundary walls must be solid, except
    /// one opening per recorded entrance/exit cell.
    fn check_wall_kinds(&self) -> Result<()> {
        let openings_allowed = match (self.entrance(), self.exit()) {
            (Some(entrance), Some(exit)) if entrance == exit => 1,
            (Some(_), Some(_)) => 2,
            (Some(_), None) | (None, Some(_)) => 1,
            (None, None) => 0,
        };
        let mut openings = 0usize;

        for col in 0..self.width() {
            for row in 0..self.height() {
                let pos = Position::new(col, row);
                for dir in Direction::ALL {
                    let wall = self.wall(pos, dir)?;
                    let valid = if self.is_boundary(pos, dir) {
                        match wall {
                            Wall::Solid => true,
                            Wall::Open => {
                                openings += 1;
                                Some(pos) == self.entrance() || Some(pos) == self.exit()
                            }
                            Wall::Closed => false,
                        }
                    } else {
                        wall != Wall::Solid
                    };
                    if !valid {
                        return Err(MazeError::InvalidStream(format!(
                            "{:?} wall on the {:?} side of {}",
                            wall, dir, pos
                        )));
                    }
                }
            }
        }

        if openings > openings_allowed {
            return Err(MazeError::InvalidStream(format!(
                "{} boundary openings for {} entrance/exit cells",
                openings, openings_allowed
            )));
        }
        Ok(())
    }
}

/// Write `maze` to `writer`; see [`Maze::save`]
pub fn save<W: Write>(maze: &Maze, writer: &mut W) -> Result<()> {
    maze.save(writer)
}

/// Read a maze from `reader`; see [`Maze::load`]
pub fn load<R: Read>(reader: &mut R) -> Result<Maze> {
    Maze::load(reader)
}
