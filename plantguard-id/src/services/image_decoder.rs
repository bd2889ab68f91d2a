//! Upload decoding
//!
//! Turns an uploaded byte stream into a [`PixelImage`]. Every accepted
//! encoding (alpha-bearing, grayscale, 16-bit, palette) is first normalized
//! to 8-bit three-channel RGB, then the red and blue channels are swapped
//! once to give the BGR order the classifier expects.

use thiserror::Error;

use crate::models::PixelImage;

/// Image decoding errors
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty upload")]
    Empty,

    #[error("not a decodable image: {0}")]
    Malformed(String),
}

/// Decode an encoded image into canonical BGR pixels
pub fn decode(bytes: &[u8]) -> Result<PixelImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let decoded =
        image::load_from_memory(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::Malformed(format!(
            "image has no pixels ({}x{})",
            width, height
        )));
    }

    let mut data = rgb.into_raw();
    for pixel in data.chunks_exact_mut(PixelImage::CHANNELS) {
        pixel.swap(0, 2);
    }

    tracing::debug!(width, height, "Decoded upload");

    PixelImage::from_bgr(width, height, data)
        .ok_or_else(|| DecodeError::Malformed("pixel buffer size mismatch".to_string()))
}
