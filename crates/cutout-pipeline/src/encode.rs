//! Serialization of the finished sticker into an in-memory container.

use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::types::{OutputFormat, PipelineError};

/// Encode an RGBA image into `format`, returning the raw bytes.
///
/// WebP output is lossless; the `image` crate has no lossy WebP encoder.
///
/// # Errors
///
/// Returns [`PipelineError::Encode`] if the encoder rejects the image.
pub fn encode(image: &RgbaImage, format: OutputFormat) -> Result<Vec<u8>, PipelineError> {
    let mut buf = Vec::new();
    let (width, height) = image.dimensions();
    let result = match format {
        OutputFormat::WebP => WebPEncoder::new_lossless(&mut buf).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
        OutputFormat::Png => PngEncoder::new(&mut buf).write_image(
            image.as_raw(),
            width,
            height,
            ExtendedColorType::Rgba8,
        ),
    };
    result.map_err(|source| PipelineError::Encode { format, source })?;
    Ok(buf)
}
