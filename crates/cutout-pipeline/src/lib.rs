//! cutout-pipeline: Pure sticker image pipeline (sans-IO).
//!
//! Turns a transparent cutout into a sticker with a solid outline:
//! decode -> scale -> pad -> edge detection -> outline stamping ->
//! compositing -> encoding.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns encoded bytes. Fetching images over HTTP
//! lives in `cutout-io`.

pub mod compose;
pub mod decode;
pub mod diagnostics;
pub mod edge;
pub mod encode;
pub mod outline;
pub mod pad;
pub mod pipeline;
pub mod scale;
pub mod types;

pub use diagnostics::PipelineDiagnostics;
pub use pipeline::Pipeline;
pub use scale::ResampleFilter;
pub use types::{
    Dimensions, OutlineColor, OutputFormat, PipelineConfig, PipelineError, StagedResult,
};

/// Run the full pipeline and return the encoded sticker bytes.
///
/// Takes raw image bytes (PNG, JPEG, BMP, WebP) and a configuration.
///
/// # Pipeline steps
///
/// 1. Decode to RGBA
/// 2. Scale so the longest side equals `config.max_side`
/// 3. Pad with a transparent margin of `config.padding`
/// 4. Laplacian edge detection
/// 5. Stamp a disk of `config.outline_radius` at every edge pixel
/// 6. Composite the padded image over the outline
/// 7. Encode to `config.output_format`
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is unrecognized.
/// Returns [`PipelineError::InvalidImage`] for a zero-sized image.
/// Returns [`PipelineError::InvalidConfig`] for an unusable config.
/// Returns [`PipelineError::Encode`] if encoding fails.
pub fn process(image_bytes: &[u8], config: &PipelineConfig) -> Result<Vec<u8>, PipelineError> {
    process_staged(image_bytes, config).map(|staged| staged.encoded)
}

/// Run the full pipeline, keeping every intermediate raster and the
/// run's diagnostics.
///
/// # Errors
///
/// Same as [`process`].
pub fn process_staged(
    image_bytes: &[u8],
    config: &PipelineConfig,
) -> Result<StagedResult, PipelineError> {
    Pipeline::new(image_bytes.to_vec(), config.clone())
        .decode()?
        .scale()?
        .pad()
        .detect_edges()
        .stamp_outline()
        .composite()?
        .encode()
}
