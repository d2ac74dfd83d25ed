//! `reqwest` implementation of the HTTP capability.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::{debug, instrument};

use crate::base::{config::Config, types::Res};

use super::{GenericHttpClient, HttpClient, HttpResponse};

// Extra methods on `HttpClient` applied by the reqwest implementation.

impl HttpClient {
    /// Creates a new reqwest-backed HTTP client.
    pub fn reqwest(config: &Config) -> Res<Self> {
        let client = ReqwestHttpClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Specific implementations.

/// reqwest HTTP client implementation.
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new reqwest HTTP client.
    ///
    /// The `User-Agent`, the optional CourtListener token and the timeout are
    /// fixed here and apply to every request.
    #[instrument(name = "ReqwestHttpClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let mut headers = HeaderMap::new();

        if let Some(token) = config.courtlistener_auth_token() {
            let mut value = HeaderValue::from_str(&format!("Token {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
            debug!("Attaching CourtListener token to outbound requests.");
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl GenericHttpClient for ReqwestHttpClient {
    #[instrument(skip(self))]
    async fn get(&self, url: &str, accept: &str) -> Res<HttpResponse> {
        let response = self.client.get(url).header(ACCEPT, accept).send().await?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_str().unwrap_or("<binary>").to_string()))
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse { status, final_url, headers, body })
    }
}
