//! Shared types for imagelab.

use std::io::Cursor;

use serde::{Deserialize, Serialize};

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Errors that can occur while reading an image's natural size.
#[derive(Debug, thiserror::Error)]
pub enum DimensionError {
    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// The header could not be read.
    #[error("failed to read image header: {0}")]
    Io(#[from] std::io::Error),

    /// The format is unrecognized or the header is corrupt.
    #[error("failed to decode image header: {0}")]
    ImageDecode(#[from] image::ImageError),
}

/// Read the natural pixel dimensions of an encoded image.
///
/// Only the header is parsed; pixel data is never decoded.
///
/// # Errors
///
/// Returns [`DimensionError::EmptyInput`] for empty input and
/// [`DimensionError::ImageDecode`] if the format is unrecognized.
pub fn read_dimensions(bytes: &[u8]) -> Result<Dimensions, DimensionError> {
    if bytes.is_empty() {
        return Err(DimensionError::EmptyInput);
    }
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(Dimensions { width, height })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Encode a solid gray PNG of the given size.
    pub(crate) fn gray_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::GrayImage::from_pixel(width, height, image::Luma([128]));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::L8,
        )
        .unwrap();
        buf
    }

    #[test]
    fn reads_png_dimensions() {
        let png = gray_png(37, 12);
        assert_eq!(
            read_dimensions(&png).unwrap(),
            Dimensions {
                width: 37,
                height: 12
            }
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            read_dimensions(&[]),
            Err(DimensionError::EmptyInput)
        ));
    }

    #[test]
    fn corrupt_input_is_rejected() {
        assert!(matches!(
            read_dimensions(&[0xFF, 0x00, 0x13]),
            Err(DimensionError::ImageDecode(_))
        ));
    }
}
