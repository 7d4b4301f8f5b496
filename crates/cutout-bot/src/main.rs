//! cutout-bot: Telegram front end for the cutout sticker pipeline.
//!
//! Runs long polling in development and an `axum` webhook server in
//! production, depending on `ENVIRONMENT`.

mod blacklist;
mod config;
mod handlers;
mod replies;
mod webhook;

use cutout_pipeline::PipelineConfig;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing_subscriber::EnvFilter;

use crate::config::BotConfig;
use crate::handlers::{Command, HandlerDeps, schema};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();
    init_tracing();

    let config = BotConfig::from_env()?;
    let webhook_url = config.webhook()?;

    let http = cutout_io::build_client(config.fetch_timeout())?;
    let headers = cutout_io::user_agent_headers(&config.user_agent)?;
    let deps = HandlerDeps::new(http, headers, PipelineConfig::default());

    let bot = Bot::new(&config.token);
    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!(error = %err, "failed to register bot commands");
    }

    match webhook_url {
        Some(url) => webhook::run(bot, schema(deps), config.listen_addr(), url).await?,
        None => {
            tracing::info!("starting long polling");
            Dispatcher::builder(bot, schema(deps))
                .enable_ctrlc_handler()
                .build()
                .dispatch()
                .await;
        }
    }

    tracing::info!("bot stopped");
    Ok(())
}
