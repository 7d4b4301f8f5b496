//! Image document → sticker round trip.

use cutout_io::Sticker;
use teloxide::prelude::*;
use teloxide::types::{Document, InputFile};
use url::Url;

use super::types::{HandlerDeps, HandlerError, RenderError};
use crate::replies;

/// Whether a MIME essence (`type/subtype`) names an image.
pub fn is_image_mime(essence: &str) -> bool {
    essence
        .split('/')
        .next()
        .is_some_and(|kind| kind.eq_ignore_ascii_case("image"))
}

/// Whether a document was sent with an `image/*` MIME type.
pub fn is_image_document(document: &Document) -> bool {
    document
        .mime_type
        .as_ref()
        .is_some_and(|mime| is_image_mime(mime.essence_str()))
}

/// Download URL of a file resolved through `getFile`.
///
/// The result embeds the bot token and must not be logged.
pub fn file_download_url(api_url: &Url, token: &str, file_path: &str) -> Result<Url, url::ParseError> {
    api_url.join(&format!("file/bot{token}/{file_path}"))
}

async fn render(bot: &Bot, document: &Document, deps: &HandlerDeps) -> Result<Sticker, RenderError> {
    let file = bot.get_file(document.file.id.clone()).await?;
    let url = file_download_url(&bot.api_url(), bot.token(), &file.path)?;
    let sticker = cutout_io::sticker_from_url(&deps.http, url.as_str(), &deps.fetch_headers, &deps.pipeline).await?;
    Ok(sticker)
}

/// Reply with a placeholder, render the sticker, then swap the
/// placeholder for the result or a failure message.
pub(super) async fn handle_image_document(
    bot: &Bot,
    msg: &Message,
    document: &Document,
    deps: &HandlerDeps,
) -> Result<(), HandlerError> {
    let chat_id = msg.chat.id;
    tracing::info!(chat_id = chat_id.0, file_id = %document.file.id.0, "image document received");

    let placeholder = bot.send_message(chat_id, replies::WORKING).await?;
    let result = render(bot, document, deps).await;

    if let Err(err) = bot.delete_message(chat_id, placeholder.id).await {
        tracing::warn!(chat_id = chat_id.0, error = %err, "failed to delete placeholder");
    }

    match result {
        Ok(sticker) => {
            let name = sticker.file_name(replies::STICKER_FILE_STEM);
            let thumbnail = InputFile::memory(sticker.bytes.clone()).file_name(name.clone());
            bot.send_document(chat_id, InputFile::memory(sticker.bytes).file_name(name))
                .thumbnail(thumbnail)
                .await?;
            tracing::info!(chat_id = chat_id.0, dimensions = %sticker.dimensions, "sticker sent");
        }
        Err(err) => {
            tracing::warn!(chat_id = chat_id.0, error = %err, "sticker rendering failed");
            bot.send_message(chat_id, err.user_reply()).await?;
        }
    }
    Ok(())
}
