//! Runtime services and shared state for casebot.

use tracing::instrument;

use crate::{
    base::{
        config::Config,
        types::{Res, Void},
    },
    service::{chat::ChatClient, court_listener::CourtListener, http::HttpClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration and every service client.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The CourtListener client.
    pub court_listener: CourtListener,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the HTTP client.
        let http = HttpClient::reqwest(&config)?;

        // Initialize the CourtListener client.
        let court_listener = CourtListener::new(&config, http);

        // Initialize the chat client.
        let chat = ChatClient::slack(&config, court_listener.clone()).await?;

        Ok(Self { config, court_listener, chat })
    }

    pub async fn start(&self) -> Void {
        self.chat.start().await
    }
}
