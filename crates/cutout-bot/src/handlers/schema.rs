//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{Document, Message};

use super::commands::{Command, handle_command, handle_text};
use super::sticker::{handle_image_document, is_image_document};
use super::types::{HandlerDeps, HandlerError};
use crate::blacklist::is_blacklisted;
use crate::replies;

/// Creates the dispatcher schema for the bot.
///
/// Branches are tried in order and the first match wins, so the
/// blacklist shadows everything else.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(blacklist_handler())
        .branch(command_handler())
        .branch(image_document_handler(deps))
        .branch(compressed_media_handler())
        .branch(text_handler())
}

fn sender_language(msg: &Message) -> Option<&str> {
    msg.from.as_ref().and_then(|user| user.language_code.as_deref())
}

fn blacklist_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| is_blacklisted(sender_language(&msg)))
        .endpoint(|bot: Bot, msg: Message| async move {
            tracing::info!(chat_id = msg.chat.id.0, language = ?sender_language(&msg), "blacklisted sender");
            bot.send_message(msg.chat.id, replies::BLACKLISTED).await?;
            Ok(())
        })
}

fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(
        dptree::entry()
            .filter_command::<Command>()
            .endpoint(|bot: Bot, msg: Message, cmd: Command| async move { handle_command(&bot, &msg, &cmd).await }),
    )
}

fn image_document_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_map(|msg: Message| msg.document().filter(|doc| is_image_document(doc)).cloned())
        .endpoint(move |bot: Bot, msg: Message, document: Document| {
            let deps = deps.clone();
            async move { handle_image_document(&bot, &msg, &document, &deps).await }
        })
}

/// Photos, videos and animations arrive recompressed without alpha.
fn compressed_media_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.photo().is_some() || msg.video().is_some() || msg.animation().is_some())
        .endpoint(|bot: Bot, msg: Message| async move {
            bot.send_message(msg.chat.id, replies::SEND_AS_FILE).await?;
            Ok(())
        })
}

fn text_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_map(|msg: Message| msg.text().filter(|text| !text.starts_with('/')).map(str::to_owned))
        .endpoint(|bot: Bot, msg: Message, text: String| async move { handle_text(&bot, &msg, &text).await })
}
