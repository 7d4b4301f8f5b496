//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! Unlike [`crate::process_staged`] which runs the entire pipeline in one
//! call, [`Pipeline`] lets the caller drive execution one step at a time:
//!
//! ```rust
//! # use cutout_pipeline::{Pipeline, PipelineConfig, PipelineError};
//! # fn run(png: Vec<u8>) -> Result<(), PipelineError> {
//! let staged = Pipeline::new(png, PipelineConfig::default())
//!     .decode()?
//!     .scale()?
//!     .pad()
//!     .detect_edges()
//!     .stamp_outline()
//!     .composite()?
//!     .encode()?;
//!
//! let sticker: Vec<u8> = staged.encoded;
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next pipeline state
//! (or `Result` for fallible stages). Every state owns the state before
//! it, so all intermediates stay reachable until
//! [`Composited::encode`] unpacks them into a [`StagedResult`].

use crate::diagnostics::{PipelineDiagnostics, StageDiagnostics, StageMetrics, Stopwatch};
use crate::types::{Dimensions, GrayImage, PipelineConfig, PipelineError, RgbaImage, StagedResult};

/// Entry point for the incremental pipeline.
pub struct Pipeline;

impl Pipeline {
    /// Start a pipeline run over `image_bytes`.
    pub const fn new(image_bytes: Vec<u8>, config: PipelineConfig) -> Pending {
        Pending {
            config,
            source: image_bytes,
        }
    }
}

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
#[must_use = "pipeline stages are consumed by advancing; call .decode() to continue"]
pub struct Pending {
    config: PipelineConfig,
    source: Vec<u8>,
}

impl Pending {
    /// The raw source image bytes.
    #[must_use]
    pub fn source(&self) -> &[u8] {
        &self.source
    }

    /// Validate the config, decode the source image and advance to the
    /// [`Decoded`] stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] for an unusable config,
    /// [`PipelineError::EmptyInput`] for empty source bytes and
    /// [`PipelineError::ImageDecode`] for undecodable data.
    pub fn decode(self) -> Result<Decoded, PipelineError> {
        self.config.validate()?;
        let clock = Stopwatch::start();
        let watch = Stopwatch::start();
        let original = crate::decode::decode(&self.source)?;
        let diag = watch.finish(StageMetrics::Decode {
            input_bytes: self.source.len(),
            dimensions: Dimensions::of(&original),
        });
        Ok(Decoded {
            config: self.config,
            clock,
            original,
            diag,
        })
    }
}

// ───────────────────────── Stage 1: Decoded ──────────────────────────

/// Pipeline state after decoding the source image to RGBA.
#[must_use = "pipeline stages are consumed by advancing; call .scale() to continue"]
pub struct Decoded {
    config: PipelineConfig,
    clock: Stopwatch,
    original: RgbaImage,
    diag: StageDiagnostics,
}

impl Decoded {
    /// The decoded RGBA image.
    #[must_use]
    pub const fn original(&self) -> &RgbaImage {
        &self.original
    }

    /// Advance to the scaling stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidImage`] if the decoded image has
    /// a zero-length side.
    pub fn scale(self) -> Result<Scaled, PipelineError> {
        let watch = Stopwatch::start();
        let scaled = crate::scale::scale(
            &self.original,
            self.config.max_side,
            self.config.resample_filter,
        )?;
        let diag = watch.finish(StageMetrics::Scale {
            from: Dimensions::of(&self.original),
            to: Dimensions::of(&scaled),
        });
        Ok(Scaled {
            prev: self,
            scaled,
            diag,
        })
    }
}

// ───────────────────────── Stage 2: Scaled ───────────────────────────

/// Pipeline state after scaling to `config.max_side`.
#[must_use = "pipeline stages are consumed by advancing; call .pad() to continue"]
pub struct Scaled {
    prev: Decoded,
    scaled: RgbaImage,
    diag: StageDiagnostics,
}

impl Scaled {
    /// The scaled RGBA image.
    #[must_use]
    pub const fn scaled(&self) -> &RgbaImage {
        &self.scaled
    }

    /// Advance to the padding stage.
    pub fn pad(self) -> Padded {
        let padding = self.prev.config.padding;
        let watch = Stopwatch::start();
        let padded = crate::pad::pad(&self.scaled, padding);
        let diag = watch.finish(StageMetrics::Pad {
            padding,
            dimensions: Dimensions::of(&padded),
        });
        Padded {
            prev: self,
            padded,
            diag,
        }
    }
}

// ───────────────────────── Stage 3: Padded ───────────────────────────

/// Pipeline state after centering on a transparent margin.
#[must_use = "pipeline stages are consumed by advancing; call .detect_edges() to continue"]
pub struct Padded {
    prev: Scaled,
    padded: RgbaImage,
    diag: StageDiagnostics,
}

impl Padded {
    /// The padded RGBA image.
    #[must_use]
    pub const fn padded(&self) -> &RgbaImage {
        &self.padded
    }

    /// Advance to the edge detection stage.
    pub fn detect_edges(self) -> EdgesDetected {
        let watch = Stopwatch::start();
        let edges = crate::edge::detect_edges(&self.padded);
        let diag = watch.finish(StageMetrics::EdgeDetection {
            edge_pixel_count: crate::edge::count_edge_pixels(&edges),
            total_pixel_count: Dimensions::of(&edges).pixel_count(),
        });
        EdgesDetected {
            prev: self,
            edges,
            diag,
        }
    }
}

// ───────────────────────── Stage 4: EdgesDetected ────────────────────

/// Pipeline state after Laplacian edge detection.
#[must_use = "pipeline stages are consumed by advancing; call .stamp_outline() to continue"]
pub struct EdgesDetected {
    prev: Padded,
    edges: GrayImage,
    diag: StageDiagnostics,
}

impl EdgesDetected {
    /// The single-channel edge map.
    #[must_use]
    pub const fn edges(&self) -> &GrayImage {
        &self.edges
    }

    /// Advance to the outline stamping stage.
    pub fn stamp_outline(self) -> Outlined {
        let config = &self.prev.prev.prev.config;
        let radius = config.outline_radius;
        let watch = Stopwatch::start();
        let overlay = crate::outline::stamp_outline(&self.edges, radius, config.outline_color);
        let diag = watch.finish(StageMetrics::Outline {
            radius,
            outline_pixel_count: crate::outline::count_outline_pixels(&overlay),
        });
        Outlined {
            prev: self,
            overlay,
            diag,
        }
    }
}

// ───────────────────────── Stage 5: Outlined ─────────────────────────

/// Pipeline state after stamping the outline overlay.
#[must_use = "pipeline stages are consumed by advancing; call .composite() to continue"]
pub struct Outlined {
    prev: EdgesDetected,
    overlay: RgbaImage,
    diag: StageDiagnostics,
}

impl Outlined {
    /// The transparent overlay carrying the outline ring.
    #[must_use]
    pub const fn overlay(&self) -> &RgbaImage {
        &self.overlay
    }

    /// Advance to the compositing stage.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::DimensionMismatch`] if the overlay and
    /// the padded image disagree in size.
    pub fn composite(self) -> Result<Composited, PipelineError> {
        let watch = Stopwatch::start();
        let composited = crate::compose::composite(&self.prev.prev.padded, &self.overlay)?;
        let diag = watch.finish(StageMetrics::Composite {
            dimensions: Dimensions::of(&composited),
        });
        Ok(Composited {
            prev: self,
            composited,
            diag,
        })
    }
}

// ───────────────────────── Stage 6: Composited ───────────────────────

/// Pipeline state after compositing; only encoding remains.
#[must_use = "pipeline stages are consumed by advancing; call .encode() to continue"]
pub struct Composited {
    prev: Outlined,
    composited: RgbaImage,
    diag: StageDiagnostics,
}

impl Composited {
    /// The outlined sticker raster.
    #[must_use]
    pub const fn composited(&self) -> &RgbaImage {
        &self.composited
    }

    /// Encode the sticker and unpack every intermediate into a
    /// [`StagedResult`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Encode`] if the encoder fails.
    pub fn encode(self) -> Result<StagedResult, PipelineError> {
        let Self {
            prev: outlined,
            composited,
            diag: composite,
        } = self;
        let Outlined {
            prev: edges_detected,
            overlay,
            diag: outline,
        } = outlined;
        let EdgesDetected {
            prev: padded_stage,
            edges,
            diag: edge_detection,
        } = edges_detected;
        let Padded {
            prev: scaled_stage,
            padded,
            diag: pad,
        } = padded_stage;
        let Scaled {
            prev: decoded,
            scaled,
            diag: scale,
        } = scaled_stage;
        let Decoded {
            config,
            clock,
            original,
            diag: decode,
        } = decoded;

        let format = config.output_format;
        let watch = Stopwatch::start();
        let encoded = crate::encode::encode(&composited, format)?;
        let encode = watch.finish(StageMetrics::Encode {
            format,
            output_bytes: encoded.len(),
        });

        Ok(StagedResult {
            original,
            scaled,
            padded,
            edges,
            overlay,
            composited,
            encoded,
            format,
            diagnostics: PipelineDiagnostics {
                decode,
                scale,
                pad,
                edge_detection,
                outline,
                composite,
                encode,
                total_duration: clock.elapsed(),
            },
        })
    }
}
