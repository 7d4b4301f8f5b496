//! Runtime configuration read from the environment.
//!
//! `.env` is loaded by `main` before extraction, so both real
//! environment variables and dotenv files feed the same keys.

use std::net::SocketAddr;
use std::time::Duration;

use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Environment variables the bot reads.
const KEYS: &[&str] = &[
    "TOKEN",
    "WEBHOOK_URL",
    "ENVIRONMENT",
    "PORT",
    "USER_AGENT",
    "FETCH_TIMEOUT_SECS",
];

/// How updates reach the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Long polling from a developer machine.
    #[default]
    Development,
    /// Telegram pushes updates to `WEBHOOK_URL`.
    Production,
}

/// Errors while reading the bot configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A key is missing or has the wrong type.
    #[error(transparent)]
    Extract(#[from] Box<figment::Error>),

    /// Production mode without a webhook address.
    #[error("WEBHOOK_URL is required when ENVIRONMENT=production")]
    MissingWebhookUrl,

    /// `WEBHOOK_URL` does not parse as a URL.
    #[error("WEBHOOK_URL is not a valid URL: {0}")]
    InvalidWebhookUrl(#[from] url::ParseError),
}

/// Bot settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot API token from @BotFather.
    pub token: String,

    /// Public HTTPS address Telegram posts updates to.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Polling or webhook mode.
    #[serde(default)]
    pub environment: Environment,

    /// Port the webhook server listens on.
    #[serde(default = "BotConfig::default_port")]
    pub port: u16,

    /// User-Agent sent when downloading source images.
    #[serde(default = "BotConfig::default_user_agent")]
    pub user_agent: String,

    /// Per-request deadline for source image downloads.
    #[serde(default = "BotConfig::default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl BotConfig {
    /// Default webhook server port.
    pub const DEFAULT_PORT: u16 = 5005;

    /// Default download deadline in seconds.
    pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

    const fn default_port() -> u16 {
        Self::DEFAULT_PORT
    }

    fn default_user_agent() -> String {
        cutout_io::DEFAULT_USER_AGENT.to_string()
    }

    const fn default_fetch_timeout_secs() -> u64 {
        Self::DEFAULT_FETCH_TIMEOUT_SECS
    }

    /// Read the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Extract`] if `TOKEN` is missing or a value
    /// has the wrong type.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_figment(&Figment::new().merge(Env::raw().only(KEYS)))
    }

    /// Extract the configuration from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Extract`] if a required key is missing or a
    /// value has the wrong type.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Extract(Box::new(e)))
    }

    /// Download deadline as a [`Duration`].
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Address the webhook server binds, on all interfaces.
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Webhook address when running in production, `None` for polling.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingWebhookUrl`] in production without a
    /// `WEBHOOK_URL`, or [`ConfigError::InvalidWebhookUrl`] if it does not
    /// parse.
    pub fn webhook(&self) -> Result<Option<Url>, ConfigError> {
        match self.environment {
            Environment::Development => Ok(None),
            Environment::Production => {
                let raw = self
                    .webhook_url
                    .as_deref()
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(ConfigError::MissingWebhookUrl)?;
                Ok(Some(Url::parse(raw)?))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::providers::Serialized;

    use super::*;

    fn figment(pairs: &[(&str, &str)]) -> Figment {
        pairs
            .iter()
            .fold(Figment::new(), |f, (key, value)| f.merge(Serialized::default(key, value)))
    }

    #[test]
    fn defaults_apply() {
        let config = BotConfig::from_figment(&figment(&[("token", "123:abc")])).unwrap();
        assert_eq!(config.token, "123:abc");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.port, 5005);
        assert_eq!(config.user_agent, cutout_io::DEFAULT_USER_AGENT);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.listen_addr().port(), 5005);
        assert!(config.webhook().unwrap().is_none());
    }

    #[test]
    fn token_is_required() {
        let result = BotConfig::from_figment(&figment(&[("port", "8080")]));
        assert!(matches!(result, Err(ConfigError::Extract(_))));
    }

    #[test]
    fn production_needs_webhook_url() {
        let config = BotConfig::from_figment(&figment(&[
            ("token", "123:abc"),
            ("environment", "production"),
        ]))
        .unwrap();
        assert!(matches!(config.webhook(), Err(ConfigError::MissingWebhookUrl)));
    }

    #[test]
    fn production_parses_webhook_url() {
        let config = BotConfig::from_figment(&figment(&[
            ("token", "123:abc"),
            ("environment", "production"),
            ("webhook_url", "https://example.com/hook"),
        ]))
        .unwrap();
        let url = config.webhook().unwrap().unwrap();
        assert_eq!(url.path(), "/hook");
    }

    #[test]
    fn malformed_webhook_url_is_rejected() {
        let config = BotConfig::from_figment(&figment(&[
            ("token", "123:abc"),
            ("environment", "production"),
            ("webhook_url", "not a url"),
        ]))
        .unwrap();
        assert!(matches!(config.webhook(), Err(ConfigError::InvalidWebhookUrl(_))));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let result = BotConfig::from_figment(&figment(&[("token", "123:abc"), ("environment", "staging")]));
        assert!(result.is_err());
    }
}
