//! Citation resolution through the `/c/` redirector.

use tracing::{debug, instrument};

use crate::base::{
    messages,
    types::{Citation, Res, Resolution},
};

use super::CourtListenerInner;

impl Resolution {
    /// The chat reply for this resolution.
    pub fn into_reply(self) -> String {
        match self {
            Resolution::Found(url) => url,
            Resolution::NotFound => messages::CITATION_NOT_FOUND.to_string(),
        }
    }
}

impl CourtListenerInner {
    /// Look up `citation`, returning where the redirector sent us.
    ///
    /// A 404 is `NotFound`; every other status yields the final URL.
    #[instrument(skip(self))]
    pub async fn resolve(&self, citation: &Citation) -> Res<Resolution> {
        let url = self.citation_url(citation);
        debug!("Resolving citation at `{}` ...", url);

        let response = self.http.get(&url, "text/html").await?;

        debug!(status = response.status, "Citation lookup responded.");
        debug!(headers = ?response.headers, "Citation lookup headers.");
        debug!(final_url = %response.final_url, "Citation lookup final URL.");

        if response.is_not_found() {
            Ok(Resolution::NotFound)
        } else {
            Ok(Resolution::Found(response.final_url))
        }
    }
}
