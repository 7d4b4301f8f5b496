//! Fetch-then-process orchestration.
//!
//! The pipeline is CPU-bound and blocking, so it runs on tokio's
//! blocking pool while the fetch stays on the async runtime.

use cutout_pipeline::{Dimensions, OutputFormat, PipelineConfig, PipelineDiagnostics, PipelineError};
use reqwest::Client;
use reqwest::header::HeaderMap;
use thiserror::Error;

use crate::fetch::{FetchError, fetch_image};

/// Errors from a full fetch-and-process run.
#[derive(Debug, Error)]
pub enum StickerError {
    /// The source image could not be retrieved.
    #[error("failed to fetch source image: {0}")]
    Fetch(#[from] FetchError),

    /// The pipeline rejected the image.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The blocking worker panicked or was cancelled.
    #[error("pipeline worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// An encoded sticker ready to be sent as a file.
#[derive(Debug, Clone)]
pub struct Sticker {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Container format of `bytes`.
    pub format: OutputFormat,
    /// Canvas size in pixels.
    pub dimensions: Dimensions,
    /// Timings and counts of the run that produced it.
    pub diagnostics: PipelineDiagnostics,
}

impl Sticker {
    /// File name for `stem` with the extension of the output format.
    #[must_use]
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.format.extension())
    }
}

/// Run the pipeline over bytes already in memory on the blocking pool.
///
/// # Errors
///
/// Returns [`StickerError::Pipeline`] if any stage fails and
/// [`StickerError::Worker`] if the blocking task does not complete.
pub async fn sticker_from_bytes(source: Vec<u8>, config: PipelineConfig) -> Result<Sticker, StickerError> {
    let staged =
        tokio::task::spawn_blocking(move || cutout_pipeline::process_staged(&source, &config)).await??;

    let dimensions = staged.dimensions();
    tracing::info!(
        %dimensions,
        format = %staged.format,
        bytes = staged.encoded.len(),
        elapsed_ms = staged.diagnostics.total_duration.as_secs_f64() * 1000.0,
        "sticker rendered"
    );

    Ok(Sticker {
        bytes: staged.encoded,
        format: staged.format,
        dimensions,
        diagnostics: staged.diagnostics,
    })
}

/// Fetch the image at `url` and turn it into a sticker.
///
/// # Errors
///
/// Returns [`StickerError::Fetch`] if the download fails or the server
/// answers with a non-success status; no bytes are produced in that
/// case. Pipeline failures surface as [`StickerError::Pipeline`].
pub async fn sticker_from_url(
    client: &Client,
    url: &str,
    headers: &HeaderMap,
    config: &PipelineConfig,
) -> Result<Sticker, StickerError> {
    let source = fetch_image(client, url, headers).await?;
    sticker_from_bytes(source, config.clone()).await
}
