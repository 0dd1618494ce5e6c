//! Depth and body-index raster buffers of a single sensor frame.

use crate::skeleton::Body;
use crate::utils::safe_cast::usize_to_f64;
use crate::{Error, Result};

/// Borrowed view of one frame's parallel rasters.
///
/// The view cannot outlive the buffers it borrows, so nothing downstream can
/// hold on to a frame after its processing call returns.
#[derive(Debug, Clone, Copy)]
pub struct DepthFrame<'a> {
    width: usize,
    height: usize,
    body_index: &'a [u8],
    depth: &'a [u16],
}

impl<'a> DepthFrame<'a> {
    /// Wrap the buffers of a `width` x `height` frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a dimension is zero or the buffer
    /// sizes disagree with each other or with the dimensions.
    pub fn new(width: usize, height: usize, body_index: &'a [u8], depth: &'a [u16]) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!("Empty frame dimensions {width}x{height}")));
        }
        let pixels = width
            .checked_mul(height)
            .ok_or_else(|| Error::InvalidInput(format!("Frame dimensions {width}x{height} overflow")))?;
        if body_index.len() != pixels {
            return Err(Error::InvalidInput(format!(
                "Body index buffer has {} pixels, expected {pixels}",
                body_index.len()
            )));
        }
        if depth.len() != pixels {
            return Err(Error::InvalidInput(format!(
                "Depth buffer has {} pixels, expected {pixels}",
                depth.len()
            )));
        }
        Ok(Self {
            width,
            height,
            body_index,
            depth,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.body_index.len()
    }

    /// Row-major iterator over `(row, body_index_row, depth_row)`
    pub fn rows(&self) -> impl Iterator<Item = (usize, &'a [u8], &'a [u16])> + 'a {
        let (body_index, depth, width) = (self.body_index, self.depth, self.width);
        body_index
            .chunks_exact(width)
            .zip(depth.chunks_exact(width))
            .enumerate()
            .map(|(row, (body_index, depth))| (row, body_index, depth))
    }

    /// Raster position of pixel `(column, row)` as floating point coordinates
    #[must_use]
    pub fn pixel_position(column: usize, row: usize) -> (f64, f64) {
        (usize_to_f64(column), usize_to_f64(row))
    }
}

/// Everything the sensor delivers for one frame, owned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorFrame {
    /// Monotonic frame counter assigned by the source
    pub index: u64,
    pub width: usize,
    pub height: usize,
    pub bodies: Vec<Body>,
    pub body_index: Vec<u8>,
    pub depth: Vec<u16>,
}

impl SensorFrame {
    /// Borrowed raster view of this frame.
    ///
    /// # Errors
    ///
    /// See [`DepthFrame::new`].
    pub fn depth_frame(&self) -> Result<DepthFrame<'_>> {
        DepthFrame::new(self.width, self.height, &self.body_index, &self.depth)
    }
}
