//! Shared types for the cutout sticker pipeline.

use std::fmt;
use std::str::FromStr;

use image::GenericImageView;
use serde::{Deserialize, Serialize};

use crate::scale::ResampleFilter;

/// Re-export `GrayImage` so downstream crates can reference the edge
/// map without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbaImage` so downstream crates can reference every
/// color raster of the pipeline without depending on `image` directly.
pub use image::RgbaImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Dimensions of any image view.
    #[must_use]
    pub fn of<I: GenericImageView>(image: &I) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }

    /// Total number of pixels.
    #[must_use]
    pub const fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Opaque RGB color used to paint the outline.
///
/// The outline is always stamped at full opacity, so there is no alpha
/// component. Parses from and displays as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl OutlineColor {
    /// Opaque white, the classic sticker border.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Create a new color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The color as a fully opaque RGBA pixel.
    #[must_use]
    pub const fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl fmt::Display for OutlineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for OutlineColor {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let invalid = || PipelineError::InvalidConfig(format!("outline color must be #rrggbb, got '{s}'"));
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Container format of the encoded sticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Lossless WebP, the format Telegram expects for static stickers.
    #[default]
    WebP,
    /// PNG, handy for inspecting results.
    Png,
}

impl OutputFormat {
    /// File extension without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Png => "png",
        }
    }

    /// MIME type of the encoded bytes.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::WebP => "image/webp",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Configuration for the sticker pipeline.
///
/// All parameters are fixed at build time through the `DEFAULT_*`
/// constants; the CLI overrides them for experimentation. The config
/// is built once and passed by reference to every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Length in pixels of the longest side after scaling, before padding.
    pub max_side: u32,

    /// Transparent margin added on every side after scaling.
    pub padding: u32,

    /// Radius in pixels of the disk stamped at every edge pixel.
    pub outline_radius: u32,

    /// Color of the outline ring.
    pub outline_color: OutlineColor,

    /// Resampling filter used by the scaling stage.
    pub resample_filter: ResampleFilter,

    /// Container format of the encoded result.
    pub output_format: OutputFormat,
}

impl PipelineConfig {
    /// Default longest side. `480 + 2 * 16 = 512`, the sticker limit.
    pub const DEFAULT_MAX_SIDE: u32 = 480;

    /// Default transparent margin.
    pub const DEFAULT_PADDING: u32 = 16;

    /// Default outline radius. Kept below the padding so the ring
    /// around a subject touching the canvas border is not clipped.
    pub const DEFAULT_OUTLINE_RADIUS: u32 = 12;

    /// Default outline color.
    pub const DEFAULT_OUTLINE_COLOR: OutlineColor = OutlineColor::WHITE;

    /// Default resampling filter.
    pub const DEFAULT_RESAMPLE_FILTER: ResampleFilter = ResampleFilter::CatmullRom;

    /// Default output container.
    pub const DEFAULT_OUTPUT_FORMAT: OutputFormat = OutputFormat::WebP;

    /// Largest padded canvas side the pipeline accepts. WebP cannot
    /// encode wider or taller images.
    pub const MAX_CANVAS_SIDE: u32 = 16_383;

    /// Check that the configuration can drive a pipeline run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `max_side` is zero, if
    /// `max_side + 2 * padding` exceeds [`Self::MAX_CANVAS_SIDE`], or if
    /// `outline_radius` is larger than that canvas side.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_side == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_side must be at least 1".to_string(),
            ));
        }
        let canvas_side = self
            .padding
            .checked_mul(2)
            .and_then(|margins| margins.checked_add(self.max_side))
            .filter(|&side| side <= Self::MAX_CANVAS_SIDE)
            .ok_or_else(|| {
                PipelineError::InvalidConfig(format!(
                    "max_side + 2 * padding must not exceed {} (max_side {}, padding {})",
                    Self::MAX_CANVAS_SIDE,
                    self.max_side,
                    self.padding,
                ))
            })?;
        if self.outline_radius > canvas_side {
            return Err(PipelineError::InvalidConfig(format!(
                "outline_radius {} exceeds the {canvas_side}px canvas",
                self.outline_radius,
            )));
        }
        Ok(())
    }

    /// Dimensions of the padded canvas for a scaled raster.
    #[must_use]
    pub const fn padded_dimensions(&self, scaled: Dimensions) -> Dimensions {
        Dimensions {
            width: scaled.width + 2 * self.padding,
            height: scaled.height + 2 * self.padding,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_side: Self::DEFAULT_MAX_SIDE,
            padding: Self::DEFAULT_PADDING,
            outline_radius: Self::DEFAULT_OUTLINE_RADIUS,
            outline_color: Self::DEFAULT_OUTLINE_COLOR,
            resample_filter: Self::DEFAULT_RESAMPLE_FILTER,
            output_format: Self::DEFAULT_OUTPUT_FORMAT,
        }
    }
}

/// Result of running the pipeline with all intermediate stage outputs
/// preserved.
///
/// Each field captures the output of one logical stage so callers can
/// inspect or dump any step of the chain.
#[derive(Debug, Clone)]
pub struct StagedResult {
    /// Stage 0: decoded source image, normalized to RGBA.
    pub original: RgbaImage,
    /// Stage 1: scaled so the longest side equals `max_side`.
    pub scaled: RgbaImage,
    /// Stage 2: scaled image centered on a transparent margin.
    pub padded: RgbaImage,
    /// Stage 3: single-channel edge map of the padded image.
    pub edges: GrayImage,
    /// Stage 4: transparent overlay carrying the outline ring.
    pub overlay: RgbaImage,
    /// Stage 5: padded image composited over the overlay.
    pub composited: RgbaImage,
    /// Stage 6: encoded bytes of the composited image.
    pub encoded: Vec<u8>,
    /// Format of `encoded`.
    pub format: OutputFormat,
    /// Per-stage timings and metrics for this run.
    pub diagnostics: crate::diagnostics::PipelineDiagnostics,
}

impl StagedResult {
    /// Dimensions of the final sticker canvas.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.composited)
    }
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// The image has a zero-length side and cannot be scaled.
    #[error("image has degenerate dimensions {width}x{height}")]
    InvalidImage {
        /// Width of the rejected image.
        width: u32,
        /// Height of the rejected image.
        height: u32,
    },

    /// Overlay and foreground disagree in size at composition time.
    #[error("overlay is {overlay} but foreground is {foreground}")]
    DimensionMismatch {
        /// Dimensions of the outline overlay.
        overlay: Dimensions,
        /// Dimensions of the padded foreground.
        foreground: Dimensions,
    },

    /// Failed to encode the result image.
    #[error("failed to encode {format} image: {source}")]
    Encode {
        /// Target container format.
        format: OutputFormat,
        /// Underlying encoder error.
        #[source]
        source: image::ImageError,
    },

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- Dimensions tests ---

    #[test]
    fn dimensions_of_image() {
        let img = RgbaImage::new(7, 3);
        assert_eq!(Dimensions::of(&img), Dimensions::new(7, 3));
        assert_eq!(Dimensions::new(7, 3).pixel_count(), 21);
    }

    #[test]
    fn dimensions_display() {
        assert_eq!(Dimensions::new(532, 282).to_string(), "532x282");
    }

    // --- OutlineColor tests ---

    #[test]
    fn outline_color_parses_hex() {
        assert_eq!(
            "#ff8000".parse::<OutlineColor>().unwrap(),
            OutlineColor::new(255, 128, 0),
        );
        assert_eq!(
            "00FF00".parse::<OutlineColor>().unwrap(),
            OutlineColor::new(0, 255, 0),
        );
    }

    #[test]
    fn outline_color_rejects_malformed_hex() {
        for bad in ["", "#fff", "#gg0000", "#ff000000", "#ффф"] {
            assert!(
                matches!(bad.parse::<OutlineColor>(), Err(PipelineError::InvalidConfig(_))),
                "expected '{bad}' to be rejected",
            );
        }
    }

    #[test]
    fn outline_color_display_matches_parse() {
        let color = OutlineColor::new(18, 52, 86);
        assert_eq!(color.to_string(), "#123456");
        assert_eq!(color.to_string().parse::<OutlineColor>().unwrap(), color);
    }

    #[test]
    fn outline_color_is_opaque() {
        assert_eq!(OutlineColor::WHITE.to_rgba(), image::Rgba([255, 255, 255, 255]));
    }

    // --- OutputFormat tests ---

    #[test]
    fn output_format_metadata() {
        assert_eq!(OutputFormat::default(), OutputFormat::WebP);
        assert_eq!(OutputFormat::WebP.extension(), "webp");
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
    }

    // --- PipelineConfig tests ---

    #[test]
    fn pipeline_config_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_side, 480);
        assert_eq!(config.padding, 16);
        assert_eq!(config.outline_radius, 12);
        assert_eq!(config.outline_color, OutlineColor::WHITE);
        assert_eq!(config.output_format, OutputFormat::WebP);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_canvas_fits_sticker_limit() {
        let config = PipelineConfig::default();
        let canvas = config.padded_dimensions(Dimensions::new(config.max_side, config.max_side));
        assert_eq!(canvas, Dimensions::new(512, 512));
    }

    #[test]
    fn zero_max_side_is_invalid() {
        let config = PipelineConfig {
            max_side: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn overflowing_padding_is_invalid() {
        for padding in [u32::MAX / 2, u32::MAX, PipelineConfig::MAX_CANVAS_SIDE] {
            let config = PipelineConfig {
                padding,
                ..PipelineConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(PipelineError::InvalidConfig(_))),
                "padding {padding}",
            );
        }
    }

    #[test]
    fn oversized_max_side_is_invalid() {
        let config = PipelineConfig {
            max_side: u32::MAX,
            padding: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn canvas_at_the_limit_is_valid() {
        let config = PipelineConfig {
            max_side: PipelineConfig::MAX_CANVAS_SIDE - 32,
            padding: 16,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn outline_radius_is_bounded_by_canvas() {
        let with_radius = |outline_radius| PipelineConfig {
            outline_radius,
            ..PipelineConfig::default()
        };
        assert!(with_radius(512).validate().is_ok());
        assert!(matches!(with_radius(513).validate(), Err(PipelineError::InvalidConfig(_))));
        assert!(matches!(with_radius(u32::MAX).validate(), Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn partial_json_config_fills_defaults() {
        let config: PipelineConfig = serde_json::from_str(r#"{"padding": 4}"#).unwrap();
        assert_eq!(config.padding, 4);
        assert_eq!(config.max_side, PipelineConfig::DEFAULT_MAX_SIDE);
    }

    #[test]
    fn pipeline_config_serde_round_trip() {
        let config = PipelineConfig {
            max_side: 256,
            padding: 8,
            outline_radius: 5,
            outline_color: OutlineColor::BLACK,
            resample_filter: ResampleFilter::Nearest,
            output_format: OutputFormat::Png,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    // --- PipelineError tests ---

    #[test]
    fn error_empty_input_display() {
        assert_eq!(PipelineError::EmptyInput.to_string(), "input image data is empty");
    }

    #[test]
    fn error_invalid_image_display() {
        let err = PipelineError::InvalidImage {
            width: 0,
            height: 12,
        };
        assert_eq!(err.to_string(), "image has degenerate dimensions 0x12");
    }

    #[test]
    fn error_dimension_mismatch_display() {
        let err = PipelineError::DimensionMismatch {
            overlay: Dimensions::new(10, 10),
            foreground: Dimensions::new(12, 10),
        };
        assert_eq!(err.to_string(), "overlay is 10x10 but foreground is 12x10");
    }
}
