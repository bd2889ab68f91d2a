//! Canonical decoded image

/// Decoded image in fixed BGR channel order, 8 bits per channel
///
/// Invariant: `data.len() == width * height * 3`. Only the image decoder
/// produces these, so the channel order is settled exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelImage {
    /// Number of channels per pixel
    pub const CHANNELS: usize = 3;

    /// Wrap an interleaved BGR buffer
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn from_bgr(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(Self::CHANNELS)?;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        Self::CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Interleaved BGR bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// `[b, g, r]` at (x, y), or `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ])
    }
}
