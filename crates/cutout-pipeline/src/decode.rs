//! Image decoding.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces an RGBA
//! raster. Every later stage works on RGBA so transparency survives the
//! whole chain, even for sources without an alpha channel.

use image::RgbaImage;

use crate::types::PipelineError;

/// Decode raw image bytes into an RGBA raster.
///
/// Sources without alpha come out fully opaque.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.into_rgba8())
}
