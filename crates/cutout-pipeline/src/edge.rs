//! Laplacian edge detection.
//!
//! Convolves every RGBA channel of the padded image with a fixed 3x3
//! Laplacian kernel and folds the responses into one channel. Non-zero
//! output marks an edge pixel.
//!
//! Channels are premultiplied by alpha before convolving, so color left
//! behind in fully transparent pixels never produces an edge.
//! Out-of-bounds neighbors read as zero, which matches the transparent
//! margin added by the padding stage.

use image::{GrayImage, Luma, RgbaImage};

use crate::scale::premultiply_pixel;

/// The 3x3 Laplacian kernel, row-major.
pub const LAPLACIAN: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 8, -1], [-1, -1, -1]];

/// Detect edges in an RGBA image.
///
/// Each channel's kernel response is clamped to `0..=255`. The color
/// responses are reduced with the ITU-R 601 luma weights and the result
/// is the maximum of that luma and the alpha response, so silhouettes
/// of dark subjects on a transparent background are still found.
///
/// Output dimensions equal input dimensions. The filter is pure integer
/// arithmetic, so identical input always yields bit-identical output.
#[must_use = "returns the edge map"]
pub fn detect_edges(image: &RgbaImage) -> GrayImage {
    let responses = laplacian_rgba(image);
    imageproc::map::map_pixels(&responses, |p| {
        let [r, g, b, a] = p.0;
        Luma([luma(r, g, b).max(a)])
    })
}

/// Apply [`LAPLACIAN`] to every channel, clamping each response.
fn laplacian_rgba(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    RgbaImage::from_fn(width, height, |x, y| {
        let mut acc = [0i32; 4];
        for (ky, row) in LAPLACIAN.iter().enumerate() {
            for (kx, &weight) in row.iter().enumerate() {
                let Some(pixel) = neighbor(image, x, y, kx, ky) else {
                    continue;
                };
                for (sum, channel) in acc.iter_mut().zip(premultiply_pixel(*pixel).0.map(i32::from)) {
                    *sum += weight * channel;
                }
            }
        }
        image::Rgba(acc.map(clamp_u8))
    })
}

/// The pixel at kernel offset `(kx, ky)` around `(x, y)`, or `None`
/// outside the image.
fn neighbor(image: &RgbaImage, x: u32, y: u32, kx: usize, ky: usize) -> Option<&image::Rgba<u8>> {
    let nx = (x + u32::try_from(kx).ok()?).checked_sub(1)?;
    let ny = (y + u32::try_from(ky).ok()?).checked_sub(1)?;
    if nx < image.width() && ny < image.height() {
        Some(image.get_pixel(nx, ny))
    } else {
        None
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn clamp_u8(value: i32) -> u8 {
    if value < 0 {
        0
    } else if value > 255 {
        255
    } else {
        value as u8
    }
}

/// ITU-R 601 luma in fixed point.
#[allow(clippy::cast_possible_truncation)]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((weighted + 500) / 1000) as u8
}

/// Number of non-zero pixels in an edge map.
#[must_use]
pub fn count_edge_pixels(edges: &GrayImage) -> u64 {
    edges.pixels().map(|p| u64::from(p.0[0] > 0)).sum()
}
