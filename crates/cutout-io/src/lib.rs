//! cutout-io: network side of the sticker pipeline.
//!
//! Downloads the source image over HTTP and runs
//! [`cutout_pipeline`] on it without blocking the async runtime.

pub mod fetch;
pub mod sticker;

pub use fetch::{FetchError, build_client, fetch_image, user_agent_headers};
pub use sticker::{Sticker, StickerError, sticker_from_bytes, sticker_from_url};

/// User-Agent sent when fetching source images.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Sticker from cutout (png/webp) bot/",
    env!("CARGO_PKG_VERSION"),
    " (https://t.me/sticker_from_cutout_bot/) reqwest"
);
