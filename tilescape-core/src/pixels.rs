/// Decoded RGBA pixel data and the walk that maps it onto a tile grid
use thiserror::Error;

/// Bytes per pixel (R, G, B, A)
pub const CHANNELS: usize = 4;

/// A pixel buffer that does not match its declared shape
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PixelBufferError {
    #[error("pixel data length {len} is not a multiple of {CHANNELS}")]
    Misaligned { len: usize },

    #[error("pixel data length {len} does not match {width}x{height} RGBA ({expected} bytes)")]
    ShapeMismatch {
        width: u32,
        height: u32,
        len: usize,
        expected: usize,
    },

    #[error("{width}x{height} RGBA does not fit in memory")]
    TooLarge { width: u32, height: u32 },
}

/// Immutable RGBA image, row-major, top row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, rejecting data that does not match `width * height * 4`
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PixelBufferError> {
        if data.len() % CHANNELS != 0 {
            return Err(PixelBufferError::Misaligned { len: data.len() });
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(PixelBufferError::TooLarge { width, height })?;
        if data.len() != expected {
            return Err(PixelBufferError::ShapeMismatch {
                width,
                height,
                len: data.len(),
                expected,
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer with no pixels
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Shape in the `[width, height, channels]` form used in log lines
    pub fn shape(&self) -> [usize; 3] {
        [self.width as usize, self.height as usize, CHANNELS]
    }

    /// Walk the pixels in buffer order with their tile grid coordinates
    pub fn walk(&self) -> PixelWalk<'_> {
        PixelWalk::new(self)
    }
}

/// Iterator over `(x, y, [r, g, b, a])` in buffer order.
///
/// The top source row maps to `y = height - 1` and the bottom row to `y = 0`,
/// so the image appears upright in a y-up frame.
pub struct PixelWalk<'a> {
    chunks: std::slice::ChunksExact<'a, u8>,
    width: u32,
    x: u32,
    y: u32,
}

impl<'a> PixelWalk<'a> {
    fn new(pixels: &'a PixelBuffer) -> Self {
        Self {
            chunks: pixels.data.chunks_exact(CHANNELS),
            width: pixels.width,
            x: 0,
            y: pixels.height.saturating_sub(1),
        }
    }
}

impl Iterator for PixelWalk<'_> {
    type Item = (u32, u32, [u8; 4]);

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        let item = (self.x, self.y, [chunk[0], chunk[1], chunk[2], chunk[3]]);

        self.x += 1;
        if self.x == self.width {
            // wrap
            self.x = 0;
            self.y = self.y.saturating_sub(1);
        }

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for PixelWalk<'_> {}
