//! Outline stamping: disk dilation of the edge map.
//!
//! Every non-zero edge pixel stamps a filled disk of radius `R` in the
//! outline color onto a transparent overlay. A pixel at offset
//! `(dx, dy)` from the center belongs to the disk when
//! `dx² + dy² <= R²`.
//!
//! Instead of testing every offset for every edge pixel, the disk is
//! described by a span table: for each row offset `dy` the half-width
//! `floor(sqrt(R² - dy²))`. Stamping then fills `2R + 1` horizontal
//! runs per edge pixel. The covered set is exactly the union of all
//! disks; the fill color is uniform, so stamp order does not matter.

use image::{GrayImage, Rgba, RgbaImage};

use crate::types::OutlineColor;

/// Half-widths of a disk of `radius`, indexed by `|dy|` in `0..=radius`.
///
/// Entry `dy` is the largest `dx` with `dx² + dy² <= radius²`.
#[must_use]
pub fn disk_spans(radius: u32) -> Vec<u32> {
    let r2 = u64::from(radius) * u64::from(radius);
    let mut spans = Vec::with_capacity(radius as usize + 1);
    let mut half = radius;
    for dy in 0..=radius {
        let dy2 = u64::from(dy) * u64::from(dy);
        // Half-widths shrink monotonically as |dy| grows.
        while u64::from(half) * u64::from(half) + dy2 > r2 {
            half -= 1;
        }
        spans.push(half);
    }
    spans
}

/// Stamp the outline ring for an edge map.
///
/// Returns an overlay with the same dimensions as `edges`: pixels
/// within `radius` of any non-zero edge pixel are `color` at full
/// opacity, every other pixel is fully transparent.
///
/// A radius of `width + height` or more already covers the whole
/// overlay from any edge pixel, so larger radii are clamped to it.
#[must_use = "returns the outline overlay"]
pub fn stamp_outline(edges: &GrayImage, radius: u32, color: OutlineColor) -> RgbaImage {
    let (width, height) = edges.dimensions();
    let mut overlay = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    let spans = disk_spans(radius.min(width.saturating_add(height)));
    let fill = color.to_rgba();

    for (x, y, pixel) in edges.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        stamp_disk(&mut overlay, x, y, &spans, fill);
    }
    overlay
}

/// Fill the disk described by `spans` centered on `(cx, cy)`, clipped
/// to the overlay.
fn stamp_disk(overlay: &mut RgbaImage, cx: u32, cy: u32, spans: &[u32], fill: Rgba<u8>) {
    let (width, height) = overlay.dimensions();
    let row_len = width as usize * 4;
    let radius = u32::try_from(spans.len().saturating_sub(1)).unwrap_or(u32::MAX);

    let y_start = cy.saturating_sub(radius);
    let y_end = cy.saturating_add(radius).min(height - 1);
    let buf: &mut [u8] = overlay;

    for y in y_start..=y_end {
        let half = spans[cy.abs_diff(y) as usize];
        let x_start = cx.saturating_sub(half) as usize;
        let x_end = cx.saturating_add(half).min(width - 1) as usize;
        let row = y as usize * row_len;
        buf[row + x_start * 4..row + (x_end + 1) * 4]
            .chunks_exact_mut(4)
            .for_each(|px| px.copy_from_slice(&fill.0));
    }
}

/// Number of opaque pixels in an overlay.
#[must_use]
pub fn count_outline_pixels(overlay: &RgbaImage) -> u64 {
    overlay.pixels().map(|p| u64::from(p.0[3] > 0)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    const RED: OutlineColor = OutlineColor::new(255, 0, 0);

    /// Brute-force reference: test every pixel against every edge pixel.
    fn reference_dilation(edges: &GrayImage, radius: u32) -> Vec<bool> {
        let r2 = i64::from(radius) * i64::from(radius);
        let seeds: Vec<(i64, i64)> = edges
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] > 0)
            .map(|(x, y, _)| (i64::from(x), i64::from(y)))
            .collect();
        edges
            .enumerate_pixels()
            .map(|(x, y, _)| {
                let (x, y) = (i64::from(x), i64::from(y));
                seeds
                    .iter()
                    .any(|&(sx, sy)| (x - sx).pow(2) + (y - sy).pow(2) <= r2)
            })
            .collect()
    }

    fn covered(overlay: &RgbaImage) -> Vec<bool> {
        overlay.pixels().map(|p| p.0[3] == 255).collect()
    }

    /// Small deterministic pseudo-random edge map (xorshift).
    fn scattered_edges(width: u32, height: u32, seed: u32, density: u32) -> GrayImage {
        let mut state = seed.max(1);
        GrayImage::from_fn(width, height, |_, _| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            if state % 100 < density {
                Luma([(state % 255 + 1) as u8])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn disk_spans_small_radii() {
        assert_eq!(disk_spans(0), vec![0]);
        assert_eq!(disk_spans(1), vec![1, 0]);
        assert_eq!(disk_spans(2), vec![2, 1, 0]);
        assert_eq!(disk_spans(5), vec![5, 4, 4, 4, 3, 0]);
    }

    #[test]
    fn single_center_pixel_yields_filled_disk() {
        let radius = 4;
        let mut edges = GrayImage::new(15, 15);
        edges.put_pixel(7, 7, Luma([255]));

        let overlay = stamp_outline(&edges, radius, RED);
        for (x, y, p) in overlay.enumerate_pixels() {
            let d2 = (i64::from(x) - 7).pow(2) + (i64::from(y) - 7).pow(2);
            if d2 <= 16 {
                assert_eq!(*p, Rgba([255, 0, 0, 255]), "({x}, {y}) should be outline");
            } else {
                assert_eq!(*p, Rgba([0, 0, 0, 0]), "({x}, {y}) should be transparent");
            }
        }
    }

    #[test]
    fn any_positive_intensity_counts_as_edge() {
        let mut edges = GrayImage::new(5, 5);
        edges.put_pixel(2, 2, Luma([1]));
        let overlay = stamp_outline(&edges, 0, RED);
        assert_eq!(count_outline_pixels(&overlay), 1);
        assert_eq!(overlay.get_pixel(2, 2).0[3], 255);
    }

    #[test]
    fn blank_edge_map_yields_transparent_overlay() {
        let overlay = stamp_outline(&GrayImage::new(9, 6), 3, RED);
        assert_eq!(overlay.dimensions(), (9, 6));
        assert_eq!(count_outline_pixels(&overlay), 0);
    }

    #[test]
    fn huge_radius_covers_the_whole_overlay() {
        let mut edges = GrayImage::new(7, 4);
        edges.put_pixel(0, 0, Luma([255]));
        let overlay = stamp_outline(&edges, u32::MAX, RED);
        assert_eq!(count_outline_pixels(&overlay), 28);
        assert_eq!(covered(&overlay), reference_dilation(&edges, 11));
    }

    #[test]
    fn disks_are_clipped_at_the_canvas_border() {
        let mut edges = GrayImage::new(6, 6);
        edges.put_pixel(0, 0, Luma([255]));
        edges.put_pixel(5, 5, Luma([255]));
        let overlay = stamp_outline(&edges, 3, RED);
        assert_eq!(covered(&overlay), reference_dilation(&edges, 3));
    }

    #[test]
    fn matches_brute_force_reference_on_random_maps() {
        for seed in 1..=12 {
            for radius in [0, 1, 2, 3, 5, 8] {
                let edges = scattered_edges(23, 17, seed * 7919, 4 + seed % 5);
                let overlay = stamp_outline(&edges, radius, RED);
                assert_eq!(
                    covered(&overlay),
                    reference_dilation(&edges, radius),
                    "seed {seed} radius {radius}",
                );
                assert!(
                    overlay
                        .pixels()
                        .all(|p| *p == Rgba([0, 0, 0, 0]) || *p == Rgba([255, 0, 0, 255])),
                    "overlay should only hold transparent or outline pixels",
                );
            }
        }
    }

    #[test]
    fn radius_larger_than_canvas() {
        let mut edges = GrayImage::new(4, 3);
        edges.put_pixel(1, 1, Luma([9]));
        let overlay = stamp_outline(&edges, 50, RED);
        assert_eq!(count_outline_pixels(&overlay), 12);
    }
}
