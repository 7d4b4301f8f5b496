//! HTTP retrieval of source images.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Errors while retrieving the source image.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP request failed with status: {status}")]
    Status {
        /// Upstream status code.
        status: StatusCode,
    },

    /// Connection, timeout or body read failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A request header value contains characters HTTP forbids.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

/// Build the shared HTTP client with a per-request deadline.
///
/// # Errors
///
/// Returns [`FetchError::Transport`] if the TLS backend cannot be
/// initialized.
pub fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Header map carrying only a `User-Agent`.
///
/// # Errors
///
/// Returns [`FetchError::InvalidHeader`] if `user_agent` is not a valid
/// header value.
pub fn user_agent_headers(user_agent: &str) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
    Ok(headers)
}

/// GET `url` with `headers` and return the response body.
///
/// Telegram file URLs embed the bot token, so the URL is neither logged
/// nor kept in the returned error.
///
/// # Errors
///
/// Returns [`FetchError::Status`] for any non-2xx response and
/// [`FetchError::Transport`] for network failures.
pub async fn fetch_image(client: &Client, url: &str, headers: &HeaderMap) -> Result<Vec<u8>, FetchError> {
    let response = client
        .get(url)
        .headers(headers.clone())
        .send()
        .await
        .map_err(reqwest::Error::without_url)?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%status, "source image fetch rejected");
        return Err(FetchError::Status { status });
    }

    let body = response.bytes().await.map_err(reqwest::Error::without_url)?;
    tracing::debug!(bytes = body.len(), "fetched source image");
    Ok(body.to_vec())
}
