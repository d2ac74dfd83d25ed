//! Case-name search.

use anyhow::anyhow;
use chrono::{Datelike, NaiveDate};
use tracing::{debug, instrument};

use crate::base::{
    messages,
    types::{CaseRecord, CaseSearchResult, Res},
};

use super::CourtListenerInner;

/// Court string for which the court is left out of the parenthetical.
const SUPREME_COURT: &str = "SCOTUS";

impl CourtListenerInner {
    /// Search by case name and format the first hit as a chat reply.
    ///
    /// Zero hits is a normal reply; transport failures, non-JSON bodies and
    /// records missing the fields we print are errors.
    #[instrument(skip(self))]
    pub async fn find(&self, query: &str) -> Res<String> {
        let url = self.search_url(query);
        debug!("Searching case names at `{}` ...", url);

        let response = self.http.get(&url, "application/json").await?;

        debug!(status = response.status, "Case search responded.");
        debug!(headers = ?response.headers, "Case search headers.");
        debug!(final_url = %response.final_url, "Case search final URL.");

        if !response.is_success() {
            return Err(anyhow!("Case search returned HTTP {}.", response.status));
        }

        let result: CaseSearchResult = serde_json::from_str(&response.body)?;
        let count = result.count.ok_or_else(|| anyhow!("Case search response has no `count`."))?;

        if count == 0 {
            return Ok(messages::zero_results(query));
        }

        let first = result.first_match().ok_or_else(|| anyhow!("Case search reported {count} hits but returned no results."))?;
        debug!(?first, "First case search hit.");

        format_case(first, &self.base_url)
    }
}

/// Format `record` as `{name}, {citation} ({court} {year})\n{url}`.
///
/// The court is omitted for the Supreme Court.
pub fn format_case(record: &CaseRecord, base_url: &str) -> Res<String> {
    let name = record.case_name.as_deref().ok_or_else(|| anyhow!("Case record has no `caseName`."))?;
    let citation = record.citation.first().ok_or_else(|| anyhow!("Case record `{name}` has no citation."))?;
    let court = record.court_citation_string.as_deref().ok_or_else(|| anyhow!("Case record `{name}` has no court."))?;
    let path = record.absolute_url.as_deref().ok_or_else(|| anyhow!("Case record `{name}` has no `absolute_url`."))?;
    let date_filed = record.date_filed.as_deref().ok_or_else(|| anyhow!("Case record `{name}` has no `dateFiled`."))?;

    let year = year_filed(date_filed)?;
    let url = format!("{base_url}{path}");

    let reply = if court == SUPREME_COURT {
        format!("{name}, {citation} ({year})\n{url}")
    } else {
        format!("{name}, {citation} ({court} {year})\n{url}")
    };

    Ok(reply)
}

/// The four-digit year of a `dateFiled` value such as `2001-05-01` or
/// `1973-01-22T00:00:00-08:00`.
fn year_filed(date_filed: &str) -> Res<String> {
    let date = date_filed.get(..10).ok_or_else(|| anyhow!("`dateFiled` value `{date_filed}` is too short."))?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;

    Ok(format!("{:04}", date.year()))
}
