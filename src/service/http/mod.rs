//! Outbound HTTP capability.
//!
//! The case-law lookups only ever issue read-only `GET`s, so the seam is a
//! single method. Keeping it behind a trait lets the lookups be tested
//! without a network.

pub mod reqwest_client;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::Res;

// Types.

/// The parts of an HTTP response the lookups care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code of the final response.
    pub status: u16,
    /// URL of the final response, after any redirects were followed.
    pub final_url: String,
    /// Response headers, in arrival order, for diagnostics.
    pub headers: Vec<(String, String)>,
    /// Response body, decoded as text.
    pub body: String,
}

impl HttpResponse {
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// Traits.

/// Generic HTTP client trait that clients must implement.
#[async_trait]
pub trait GenericHttpClient: Send + Sync + 'static {
    /// Issue a `GET` to `url`, following redirects.
    ///
    /// Transport failures (DNS, TLS, timeout) are errors; any status code is
    /// a successful response.
    async fn get(&self, url: &str, accept: &str) -> Res<HttpResponse>;
}

// Structs.

/// HTTP client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<dyn GenericHttpClient>,
}

impl Deref for HttpClient {
    type Target = dyn GenericHttpClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl HttpClient {
    pub fn new(inner: Arc<dyn GenericHttpClient>) -> Self {
        Self { inner }
    }
}

// Mocks.
