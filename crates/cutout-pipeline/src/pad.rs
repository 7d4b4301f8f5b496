//! Transparent margin around the scaled image.
//!
//! The margin gives the outline ring room to grow outward from subjects
//! that touch the canvas border.

use image::{Rgba, RgbaImage};

/// Center `image` on a fully transparent canvas `padding` pixels larger
/// on every side.
///
/// The output is exactly `(w + 2 * padding) x (h + 2 * padding)`.
#[must_use = "returns the padded image"]
pub fn pad(image: &RgbaImage, padding: u32) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(
        image.width() + 2 * padding,
        image.height() + 2 * padding,
        Rgba([0, 0, 0, 0]),
    );
    image::imageops::replace(&mut canvas, image, i64::from(padding), i64::from(padding));
    canvas
}
