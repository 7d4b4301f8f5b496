//! Alpha compositing of the padded image over the outline overlay.
//!
//! Standard Porter-Duff "over" on straight (non-premultiplied) alpha,
//! with the original as foreground. Opaque subject pixels hide the
//! ring; the ring shows through wherever the subject is transparent.

use image::{Rgba, RgbaImage};

use crate::types::{Dimensions, PipelineError};

/// Composite `foreground` over `background`.
///
/// # Errors
///
/// Returns [`PipelineError::DimensionMismatch`] if the two rasters differ
/// in size. Correctly chained stages never trigger this.
pub fn composite(foreground: &RgbaImage, background: &RgbaImage) -> Result<RgbaImage, PipelineError> {
    let fg_dims = Dimensions::of(foreground);
    let bg_dims = Dimensions::of(background);
    if fg_dims != bg_dims {
        return Err(PipelineError::DimensionMismatch {
            overlay: bg_dims,
            foreground: fg_dims,
        });
    }
    Ok(imageproc::map::map_pixels2(foreground, background, over))
}

/// Porter-Duff "over" for a single pixel.
///
/// Exact in the two cases that dominate a sticker: a fully opaque
/// foreground and a fully transparent background both return the
/// foreground unchanged.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn over(fg: Rgba<u8>, bg: Rgba<u8>) -> Rgba<u8> {
    let fa = fg.0[3];
    let ba = bg.0[3];
    if fa == 255 || ba == 0 {
        return fg;
    }
    if fa == 0 {
        return bg;
    }

    let fa = f32::from(fa) / 255.0;
    let ba = f32::from(ba) / 255.0;
    let out_a = fa + ba * (1.0 - fa);

    let channel = |f: u8, b: u8| -> u8 {
        let c = (f32::from(f) * fa + f32::from(b) * ba * (1.0 - fa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(fg.0[0], bg.0[0]),
        channel(fg.0[1], bg.0[1]),
        channel(fg.0[2], bg.0[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
