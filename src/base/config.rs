//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc, time::Duration};

use serde::Deserialize;

use super::types::Res;

/// Default `User-Agent` for outbound HTTP calls.
fn default_user_agent() -> String {
    format!("casebot/{}", env!("CARGO_PKG_VERSION"))
}

/// Default CourtListener origin.
fn default_courtlistener_base_url() -> String {
    "https://www.courtlistener.com".to_string()
}

/// Default timeout, in seconds, for outbound HTTP calls.
fn default_http_timeout_secs() -> u64 {
    10
}

/// Configuration for the casebot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Slack app token used for Socket Mode (`SLACK_APP_TOKEN`).
    pub slack_app_token: String,
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// `User-Agent` sent with every CourtListener request (`USER_AGENT`).
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// CourtListener origin, without a trailing slash (`COURTLISTENER_BASE_URL`).
    #[serde(default = "default_courtlistener_base_url")]
    pub courtlistener_base_url: String,
    /// CourtListener API token (`COURTLISTENER_TOKEN`).
    #[serde(default)]
    pub courtlistener_token: Option<String>,
    /// Whether to attach the CourtListener token to requests (`COURTLISTENER_SEND_TOKEN`).
    #[serde(default)]
    pub courtlistener_send_token: bool,
    /// Timeout applied to every outbound HTTP call (`HTTP_TIMEOUT_SECS`).
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl ConfigInner {
    /// The timeout as a `Duration`.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// The token to attach to CourtListener requests, if sending is enabled.
    pub fn courtlistener_auth_token(&self) -> Option<&str> {
        if self.courtlistener_send_token { self.courtlistener_token.as_deref() } else { None }
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("CASEBOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let inner: ConfigInner = cfg.build()?.try_deserialize()?;

        Self::validate(inner)
    }

    /// Check and normalize a freshly deserialized configuration.
    pub fn validate(mut inner: ConfigInner) -> Res<Self> {
        if inner.http_timeout_secs < 1 || inner.http_timeout_secs > 120 {
            return Err(anyhow::anyhow!("HTTP timeout must be between 1 and 120 seconds."));
        }

        if !inner.courtlistener_base_url.starts_with("http://") && !inner.courtlistener_base_url.starts_with("https://") {
            return Err(anyhow::anyhow!("CourtListener base URL must start with `http://` or `https://`."));
        }

        if inner.courtlistener_send_token && inner.courtlistener_token.as_deref().is_none_or(str::is_empty) {
            return Err(anyhow::anyhow!("`courtlistener_send_token` is set but no CourtListener token is configured."));
        }

        let trimmed = inner.courtlistener_base_url.trim_end_matches('/').len();
        inner.courtlistener_base_url.truncate(trimmed);

        Ok(inner.into())
    }
}
