//! Slash commands and plain-text replies

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use super::types::HandlerError;
use crate::replies;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Я вмію:")]
pub enum Command {
    #[command(description = "привітання та інструкція")]
    Start,
    #[command(description = "попрощатися")]
    Stop,
}

impl Command {
    pub const fn reply(&self) -> &'static str {
        match self {
            Self::Start => replies::GREETING,
            Self::Stop => replies::GOODBYE,
        }
    }
}

/// Messages answering a non-command text.
pub fn text_replies(text: &str) -> &'static [&'static str] {
    if text == replies::PING {
        &[replies::PONG]
    } else {
        &[replies::NO_IMAGE, replies::NO_IMAGE_EMOJI]
    }
}

pub(super) async fn handle_command(bot: &Bot, msg: &Message, cmd: &Command) -> Result<(), HandlerError> {
    tracing::info!(chat_id = msg.chat.id.0, command = ?cmd, "command received");
    bot.send_message(msg.chat.id, cmd.reply()).await?;
    Ok(())
}

pub(super) async fn handle_text(bot: &Bot, msg: &Message, text: &str) -> Result<(), HandlerError> {
    for reply in text_replies(text) {
        bot.send_message(msg.chat.id, *reply).await?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse() {
        assert_eq!(Command::parse("/start", "cutout_bot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/stop", "cutout_bot").unwrap(), Command::Stop);
        assert_eq!(Command::parse("/start@cutout_bot", "cutout_bot").unwrap(), Command::Start);
        assert!(Command::parse("/help", "cutout_bot").is_err());
    }

    #[test]
    fn commands_are_registered_with_descriptions() {
        let commands = Command::bot_commands();
        let names: Vec<_> = commands.iter().map(|c| c.command.trim_start_matches('/')).collect();
        assert_eq!(names, ["start", "stop"]);
        assert!(commands.iter().all(|c| !c.description.is_empty()));
    }

    #[test]
    fn start_links_segment_anything() {
        assert!(Command::Start.reply().contains("https://segment-anything.com/demo"));
        assert_eq!(Command::Stop.reply(), replies::GOODBYE);
    }

    #[test]
    fn ping_gets_pong() {
        assert_eq!(text_replies("ping"), [replies::PONG]);
    }

    #[test]
    fn other_text_gets_hint_then_emoji() {
        assert_eq!(text_replies("hello"), [replies::NO_IMAGE, "🙈"]);
        assert_eq!(text_replies("Ping"), [replies::NO_IMAGE, "🙈"]);
    }
}
