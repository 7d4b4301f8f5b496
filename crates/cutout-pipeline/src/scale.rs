//! Scaling to the sticker canvas.
//!
//! Resizes the decoded image so its longest side is exactly
//! `max_side` pixels. Unlike a thumbnailer this stage both shrinks and
//! grows: stickers are always delivered at the same canvas size.
//!
//! Both directions use the same formula, dividing the source dimensions
//! by `scale = max(W, H) / max_side` and rounding to the nearest pixel.

use std::fmt;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, PipelineError};

/// Resampling filter used when scaling.
///
/// Ordered from fastest/lowest-quality to slowest/highest-quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResampleFilter {
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Bilinear interpolation: fast, decent quality.
    Triangle,
    /// Bicubic (Catmull-Rom): moderate speed, good quality.
    #[default]
    CatmullRom,
    /// Gaussian: moderate speed, smooth output.
    Gaussian,
    /// Lanczos with 3 lobes: slowest, sharpest.
    Lanczos3,
}

impl ResampleFilter {
    /// Convert to the `image` crate's `FilterType`.
    const fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Gaussian => image::imageops::FilterType::Gaussian,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("Nearest"),
            Self::Triangle => f.write_str("Triangle"),
            Self::CatmullRom => f.write_str("CatmullRom"),
            Self::Gaussian => f.write_str("Gaussian"),
            Self::Lanczos3 => f.write_str("Lanczos3"),
        }
    }
}

/// Compute the scaled dimensions for a `width x height` source.
///
/// The longest side maps to `max_side` and the other side keeps the
/// aspect ratio, rounded to the nearest pixel and never below 1.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidImage`] if either side is zero.
/// Returns [`PipelineError::InvalidConfig`] if `max_side` is zero.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops
)]
pub fn scaled_dimensions(source: Dimensions, max_side: u32) -> Result<Dimensions, PipelineError> {
    let Dimensions { width, height } = source;
    if width == 0 || height == 0 {
        return Err(PipelineError::InvalidImage { width, height });
    }
    if max_side == 0 {
        return Err(PipelineError::InvalidConfig(
            "max_side must be at least 1".to_string(),
        ));
    }

    let scale = f64::from(width.max(height)) / f64::from(max_side);
    let side = |len: u32| -> u32 { (f64::from(len) / scale).round().max(1.0) as u32 };

    Ok(Dimensions {
        width: side(width),
        height: side(height),
    })
}

/// Scale an image so the longest side is exactly `max_side` pixels.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidImage`] for a zero-width or
/// zero-height image.
pub fn scale(
    image: &RgbaImage,
    max_side: u32,
    filter: ResampleFilter,
) -> Result<RgbaImage, PipelineError> {
    let target = scaled_dimensions(Dimensions::of(image), max_side)?;
    if target == Dimensions::of(image) {
        return Ok(image.clone());
    }
    let resized = image::imageops::resize(
        &imageproc::map::map_pixels(image, premultiply_pixel),
        target.width,
        target.height,
        filter.to_image_filter(),
    );
    Ok(imageproc::map::map_pixels(&resized, unpremultiply_pixel))
}

/// Scale color channels by alpha, rounding to nearest.
///
/// Resampling premultiplied pixels keeps color hidden under zero alpha
/// from bleeding into the visible fringe.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn premultiply_pixel(pixel: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let scale = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
    Rgba([scale(r), scale(g), scale(b), a])
}

/// Inverse of [`premultiply_pixel`]. Zero alpha maps to transparent
/// black; channels above alpha (filter overshoot) saturate at 255.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn unpremultiply_pixel(pixel: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    if a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let alpha = u32::from(a);
    let scale = |c: u8| ((u32::from(c) * 255 + alpha / 2) / alpha).min(255) as u8;
    Rgba([scale(r), scale(g), scale(b), a])
}
