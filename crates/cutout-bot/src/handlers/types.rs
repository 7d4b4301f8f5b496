//! Handler dependencies and error types

use std::sync::Arc;

use cutout_io::StickerError;
use cutout_pipeline::PipelineConfig;
use reqwest::Client;
use reqwest::header::HeaderMap;
use thiserror::Error;

use crate::replies;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies shared by every handler
#[derive(Clone)]
pub struct HandlerDeps {
    pub http: Client,
    pub fetch_headers: Arc<HeaderMap>,
    pub pipeline: Arc<PipelineConfig>,
}

impl HandlerDeps {
    pub fn new(http: Client, fetch_headers: HeaderMap, pipeline: PipelineConfig) -> Self {
        Self {
            http,
            fetch_headers: Arc::new(fetch_headers),
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Why a document could not be turned into a sticker.
#[derive(Debug, Error)]
pub enum RenderError {
    /// `getFile` failed.
    #[error("telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("could not build file download URL: {0}")]
    DownloadUrl(#[from] url::ParseError),

    #[error(transparent)]
    Sticker(#[from] StickerError),
}

impl RenderError {
    /// Text shown to the user for this failure.
    pub const fn user_reply(&self) -> &'static str {
        match self {
            Self::Telegram(_) | Self::DownloadUrl(_) | Self::Sticker(StickerError::Fetch(_)) => replies::FETCH_FAILED,
            Self::Sticker(StickerError::Pipeline(_) | StickerError::Worker(_)) => replies::PROCESSING_FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use cutout_io::FetchError;
    use cutout_pipeline::PipelineError;

    use super::*;

    #[test]
    fn fetch_failures_ask_to_retry() {
        let err = RenderError::Sticker(StickerError::Fetch(FetchError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
        }));
        assert_eq!(err.user_reply(), replies::FETCH_FAILED);

        let err = RenderError::DownloadUrl(url::ParseError::EmptyHost);
        assert_eq!(err.user_reply(), replies::FETCH_FAILED);
    }

    #[test]
    fn pipeline_failures_explain_the_input() {
        let err = RenderError::Sticker(StickerError::Pipeline(PipelineError::EmptyInput));
        assert_eq!(err.user_reply(), replies::PROCESSING_FAILED);
    }
}
