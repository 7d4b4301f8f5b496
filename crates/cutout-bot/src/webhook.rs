//! Webhook mode: Telegram posts updates to an `axum` server that also
//! serves a small landing page.

use std::net::SocketAddr;

use axum::Router;
use axum::response::Html;
use axum::routing::get;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::UpdateListener;
use teloxide::update_listeners::webhooks::{self, Options};
use url::Url;

use crate::handlers::HandlerError;

const INDEX_HTML: &str = include_str!("../assets/index.html");

async fn landing_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Add the landing page to the webhook router.
///
/// Only unmatched requests reach it, so the webhook path keeps working
/// even when it is `/`.
pub fn with_landing_page(router: Router) -> Router {
    router.fallback(get(landing_page))
}

/// Register the webhook, serve it on `addr` and dispatch updates until
/// ctrl-c.
pub async fn run(bot: Bot, handler: UpdateHandler<HandlerError>, addr: SocketAddr, url: Url) -> anyhow::Result<()> {
    tracing::info!(%addr, path = url.path(), "starting webhook server");

    let (mut listener, stop_flag, router) = webhooks::axum_to_router(bot.clone(), Options::new(addr, url)).await?;
    let stop_token = listener.stop_token();
    let app = with_landing_page(router);
    let tcp = tokio::net::TcpListener::bind(addr).await?;

    tokio::spawn(async move {
        if let Err(err) = axum::serve(tcp, app).with_graceful_shutdown(stop_flag).await {
            tracing::error!(error = %err, "webhook server failed");
            stop_token.stop();
        }
    });

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn landing_page_is_html() {
        let Html(body) = landing_page().await;
        assert!(body.contains("<html"));
        assert!(body.contains("t.me/sticker_from_cutout_bot"));
    }
}
