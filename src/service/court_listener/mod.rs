//! CourtListener lookups.
//!
//! Two read-only operations sit on top of the HTTP capability:
//! - `resolve` follows the `/c/{reporter}/{volume}/{page}/` citation redirector.
//! - `find` runs a case-name search and formats the first hit.
//!
//! URL construction and reply formatting are plain functions so they can be
//! checked without any client at all.

pub mod citation;
pub mod search;

use std::{ops::Deref, sync::Arc};

use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::{
    base::{config::Config, types::Citation},
    service::http::HttpClient,
};

/// Characters escaped in a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'%').add(b'/').add(b'<').add(b'>').add(b'?').add(b'`').add(b'{').add(b'}');

/// CourtListener client.
///
/// Like the other services it is trivially cloneable.
#[derive(Clone)]
pub struct CourtListener {
    pub inner: Arc<CourtListenerInner>,
}

impl Deref for CourtListener {
    type Target = CourtListenerInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct CourtListenerInner {
    http: HttpClient,
    base_url: String,
}

impl CourtListener {
    pub fn new(config: &Config, http: HttpClient) -> Self {
        Self::with_base_url(&config.courtlistener_base_url, http)
    }

    pub fn with_base_url(base_url: &str, http: HttpClient) -> Self {
        Self {
            inner: Arc::new(CourtListenerInner {
                http,
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        }
    }
}

impl CourtListenerInner {
    /// The citation redirector URL for `citation`.
    pub fn citation_url(&self, citation: &Citation) -> String {
        citation_url(&self.base_url, citation)
    }

    /// The case-name search URL for `query`.
    pub fn search_url(&self, query: &str) -> String {
        search_url(&self.base_url, query)
    }
}

pub fn citation_url(base_url: &str, citation: &Citation) -> String {
    let reporter = utf8_percent_encode(&citation.reporter, PATH_SEGMENT);
    format!("{base_url}/c/{reporter}/{}/{}/", citation.volume, citation.page)
}

pub fn search_url(base_url: &str, query: &str) -> String {
    let query = utf8_percent_encode(query, NON_ALPHANUMERIC);
    format!("{base_url}/api/rest/v3/search/?format=json&q=casename%3A({query})")
}
