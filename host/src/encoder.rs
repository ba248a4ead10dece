//! PNG output for rendered mazes

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use maze_core::{Bitmap, ImageEncoder, MazeError};

/// Writes bitmaps as 1-bit grayscale, non-interlaced PNG files
#[derive(Debug, Clone)]
pub struct PngEncoder {
    path: PathBuf,
}

impl PngEncoder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn encoding_err(e: png::EncodingError) -> MazeError {
    match e {
        png::EncodingError::IoError(io) => MazeError::Io(io),
        other => MazeError::Io(io::Error::new(io::ErrorKind::Other, other.to_string())),
    }
}

fn dimension(value: usize, what: &str) -> Result<u32, MazeError> {
    u32::try_from(value).map_err(|_| {
        MazeError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("image {} {} exceeds the PNG limit", what, value),
        ))
    })
}

impl ImageEncoder for PngEncoder {
    fn encode(&mut self, bitmap: &Bitmap) -> Result<(), MazeError> {
        let width = dimension(bitmap.width(), "width")?;
        let height = dimension(bitmap.height(), "height")?;

        let file = File::create(&self.path)?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::One);

        let mut writer = encoder.write_header().map_err(encoding_err)?;
        // Bitmap rows are already packed MSB-first with 1 = white, as PNG expects
        writer.write_image_data(bitmap.as_bytes()).map_err(encoding_err)?;
        writer.finish().map_err(encoding_err)?;

        tracing::info!("Wrote {}x{} PNG to {}", width, height, self.path.display());
        Ok(())
    }
}
