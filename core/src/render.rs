//! Monochrome bitmap rendering
//!
//! A maze of W x H cells rendered at `grid_size` pixels per cell produces a
//! `(W + 2) * grid_size` by `(H + 2) * grid_size` image: one empty cell of
//! margin on every side keeps the outer walls visible.
//!
//! Each cell draws only its west and north walls, so a wall shared by two
//! cells is drawn once. Cells on the bottom row also draw their south wall
//! and cells in the right column their east wall. Vertical runs are one
//! pixel longer than the cell so they meet the horizontal runs below.

use tracing::debug;

use crate::error::{MazeError, Result};
use crate::grid::Maze;
use crate::wall::Direction;
use crate::MIN_GRID_SIZE;

/// Packed 1-bit-per-pixel image, rows top to bottom.
///
/// Bits are most-significant first within each byte; a set bit is
/// background (white) and a clear bit is a wall (black). Every row starts on
/// a byte boundary and occupies `ceil(width / 8)` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    stride: usize,
    bits: Vec<u8>,
}

impl Bitmap {
    /// All-background bitmap
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width.div_ceil(8);
        Self {
            width,
            height,
            stride,
            bits: vec![0xFF; stride * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The packed rows, concatenated
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.bits.chunks(self.stride)
    }

    /// Whether (`x`, `y`) is background; `false` outside the image
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[y * self.stride + x / 8] & (0x80 >> (x % 8)) != 0
    }

    /// Paint (`x`, `y`) as a wall pixel; pixels outside the image are ignored
    pub fn clear(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.bits[y * self.stride + x / 8] &= !(0x80 >> (x % 8));
    }

    fn vertical_run(&mut self, x: usize, y: usize, len: usize) {
        for y2 in y..y + len {
            self.clear(x, y2);
        }
    }

    fn horizontal_run(&mut self, x: usize, y: usize, len: usize) {
        for x2 in x..x + len {
            self.clear(x2, y);
        }
    }
}

/// Consumer of rendered bitmaps, such as a PNG file writer
pub trait ImageEncoder {
    /// Persist `bitmap`; failures surface as [`MazeError::Io`]
    fn encode(&mut self, bitmap: &Bitmap) -> Result<()>;
}

/// Render `maze` with cells `grid_size` pixels wide.
///
/// # Errors
/// [`MazeError::InvalidGridSize`] if `grid_size` is below 2 or the image
/// dimensions overflow `usize`.
pub fn render(maze: &Maze, grid_size: usize) -> Result<Bitmap> {
    if grid_size < MIN_GRID_SIZE {
        return Err(MazeError::InvalidGridSize(grid_size));
    }

    let pixel_width = maze
        .width()
        .checked_add(2)
        .and_then(|w| w.checked_mul(grid_size))
        .ok_or(MazeError::InvalidGridSize(grid_size))?;
    let pixel_height = maze
        .height()
        .checked_add(2)
        .and_then(|h| h.checked_mul(grid_size))
        .ok_or(MazeError::InvalidGridSize(grid_size))?;

    let mut bitmap = Bitmap::new(pixel_width, pixel_height);
    let east_col = maze.width() - 1;
    let south_row = maze.height() - 1;

    for col in 0..=east_col {
        let x = (col + 1) * grid_size;

        for row in 0..=south_row {
            let y = (row + 1) * grid_size;
            let cell = maze.get_cell(col, row)?;

            if !cell.wall(Direction::West).is_open() {
                bitmap.vertical_run(x, y, grid_size + 1);
            }

            if !cell.wall(Direction::North).is_open() {
                bitmap.horizontal_run(x, y, grid_size);
            }

            if row == south_row && !cell.wall(Direction::South).is_open() {
                bitmap.horizontal_run(x, y + grid_size, grid_size);
            }

            if col == east_col && !cell.wall(Direction::East).is_open() {
                bitmap.vertical_run(x + grid_size, y, grid_size + 1);
            }
        }
    }

    debug!(
        "Rendered {}x{} maze to {}x{} bitmap",
        maze.width(),
        maze.height(),
        pixel_width,
        pixel_height
    );
    Ok(bitmap)
}

/// Render `maze` and hand the bitmap to `encoder`
pub fn render_to(maze: &Maze, grid_size: usize, encoder: &mut dyn ImageEncoder) -> Result<()> {
    let bitmap = render(maze, grid_size)?;
    encoder.encode(&bitmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::architect::FloorPlan;
    use crate::maze_gen::RecursiveBacktracker;
    use crate::rng::SimpleLCG;
    use crate::wall::{Position, Wall};

    /// Collects bitmaps instead of writing files
    #[derive(Default)]
    struct MemoryEncoder {
        images: Vec<Bitmap>,
    }

    impl ImageEncoder for MemoryEncoder {
        fn encode(&mut self, bitmap: &Bitmap) -> Result<()> {
            self.images.push(bitmap.clone());
            Ok(())
        }
    }

    struct FailingEncoder;

    impl ImageEncoder for FailingEncoder {
        fn encode(&mut self, _bitmap: &Bitmap) -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    /// '#' for wall pixels, '.' for background
    fn picture(bitmap: &Bitmap) -> Vec<String> {
        (0..bitmap.height())
            .map(|y| {
                (0..bitmap.width())
                    .map(|x| if bitmap.is_set(x, y) { '.' } else { '#' })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_grid_size_floor() {
        let maze = Maze::create(2, 2).unwrap();
        assert!(matches!(render(&maze, 0), Err(MazeError::InvalidGridSize(0))));
        assert!(matches!(render(&maze, 1), Err(MazeError::InvalidGridSize(1))));
        assert!(render(&maze, 2).is_ok());
    }

    #[test]
    fn test_dimensions() {
        let maze = Maze::create(7, 3).unwrap();
        let bitmap = render(&maze, 5).unwrap();
        assert_eq!(bitmap.width(), 45);
        assert_eq!(bitmap.height(), 25);
        assert_eq!(bitmap.stride(), 6);
        assert_eq!(bitmap.as_bytes().len(), 6 * 25);
        assert!(bitmap.rows().all(|row| row.len() == 6));
    }

    #[test]
    fn test_shared_edges_drawn_once() {
        // 2x2, interior walls closed, openings in the north wall of both top cells
        let mut maze = Maze::create(2, 2).unwrap();
        {
            let mut plan = FloorPlan::new(&mut maze);
            plan.open_boundary(Position::new(0, 0), Direction::North).unwrap();
            plan.open_boundary(Position::new(1, 0), Direction::North).unwrap();
            plan.set_entrance(Position::new(0, 0));
            plan.set_exit(Position::new(1, 0));
        }

        let bitmap = render(&maze, 2).unwrap();
        let expected = [
            "........",
            "........",
            "..#.#.#.",
            "..#.#.#.",
            "..#####.",
            "..#.#.#.",
            "..#####.",
            "........",
        ];
        assert_eq!(picture(&bitmap), expected);
    }

    #[test]
    fn test_closed_maze_outline() {
        let maze = Maze::create(2, 2).unwrap();
        let bitmap = render(&maze, 3).unwrap();

        // Margin stays background
        for i in 0..12 {
            assert!(bitmap.is_set(i, 0));
            assert!(bitmap.is_set(0, i));
            assert!(bitmap.is_set(11, i));
            assert!(bitmap.is_set(i, 11));
        }
        // Outer frame from (3,3) to (9,9), interior cross at 6
        for i in 3..=9 {
            assert!(!bitmap.is_set(i, 3));
            assert!(!bitmap.is_set(i, 9));
            assert!(!bitmap.is_set(3, i));
            assert!(!bitmap.is_set(9, i));
            assert!(!bitmap.is_set(6, i));
            assert!(!bitmap.is_set(i, 6));
        }
        assert!(bitmap.is_set(4, 4));
        assert!(bitmap.is_set(8, 8));
    }

    #[test]
    fn test_padding_bits() {
        // 3 columns at grid size 2: 10 pixels, 2 bytes per row
        let maze = Maze::create(3, 2).unwrap();
        let bitmap = render(&maze, 2).unwrap();
        assert_eq!(bitmap.stride(), 2);
        for row in bitmap.rows() {
            // Bits past the image width keep the background value
            assert_eq!(row[1] & 0x3F, 0x3F);
        }
        assert!(!bitmap.is_set(100, 0));
    }

    #[test]
    fn test_clear_ignores_outside_pixels() {
        let mut bitmap = Bitmap::new(10, 4);
        let before = bitmap.clone();
        bitmap.clear(10, 0);
        bitmap.clear(15, 1);
        bitmap.clear(0, 4);
        bitmap.clear(usize::MAX, usize::MAX);
        assert_eq!(bitmap, before);

        bitmap.clear(9, 3);
        assert!(!bitmap.is_set(9, 3));
        assert!(bitmap.is_set(8, 3));
    }

    #[test]
    fn test_generated_maze_openings() {
        let mut rng = SimpleLCG::new(42);
        let maze = Maze::generate(6, 6, &mut RecursiveBacktracker::new(), &mut rng).unwrap();
        let grid_size = 4;
        let bitmap = render(&maze, grid_size).unwrap();

        for pos in [maze.entrance().unwrap(), maze.exit().unwrap()] {
            let x = (pos.col + 1) * grid_size;
            let y = (pos.row + 1) * grid_size;
            let mid = grid_size / 2;
            let cell = maze.get_cell(pos.col, pos.row).unwrap();
            let open_pixel = if cell.north() == Wall::Open && pos.row == 0 {
                (x + mid, y)
            } else if cell.south() == Wall::Open && pos.row == 5 {
                (x + mid, y + grid_size)
            } else if cell.west() == Wall::Open && pos.col == 0 {
                (x, y + mid)
            } else {
                (x + grid_size, y + mid)
            };
            assert!(bitmap.is_set(open_pixel.0, open_pixel.1), "opening at {}", pos);
        }
    }

    #[test]
    fn test_render_to_encoder() {
        let maze = Maze::create(3, 3).unwrap();
        let mut encoder = MemoryEncoder::default();
        render_to(&maze, 4, &mut encoder).unwrap();

        assert_eq!(encoder.images.len(), 1);
        assert_eq!(encoder.images[0], render(&maze, 4).unwrap());

        assert!(matches!(render_to(&maze, 4, &mut FailingEncoder), Err(MazeError::Io(_))));
        assert!(matches!(
            render_to(&maze, 1, &mut encoder),
            Err(MazeError::InvalidGridSize(1))
        ));
        assert_eq!(encoder.images.len(), 1);
    }
}
