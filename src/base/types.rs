//! Result aliases and the value types that flow between the dispatcher and
//! the services.

use serde::Deserialize;

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// A legal citation locator, e.g. `410 U.S. 113`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub volume: u32,
    pub reporter: String,
    pub page: u32,
}

impl std::fmt::Display for Citation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.volume, self.reporter, self.page)
    }
}

/// Outcome of a citation lookup against the `/c/` resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The final location after following redirects.
    Found(String),
    /// The service answered 404.
    NotFound,
}

/// A single opinion from the case-name search endpoint.
///
/// Every field is optional on the wire; the finder decides which ones it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CaseRecord {
    #[serde(rename = "caseName", default)]
    pub case_name: Option<String>,
    #[serde(default)]
    pub court_citation_string: Option<String>,
    #[serde(default)]
    pub citation: Vec<String>,
    #[serde(rename = "dateFiled", default)]
    pub date_filed: Option<String>,
    #[serde(default)]
    pub absolute_url: Option<String>,
}

/// Body of the case-name search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CaseSearchResult {
    pub count: Option<u64>,
    #[serde(default)]
    pub results: Vec<CaseRecord>,
}

impl CaseSearchResult {
    pub fn first_match(&self) -> Option<&CaseRecord> {
        self.results.first()
    }
}

/// The classification of one incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Greeting,
    AttachmentDemo,
    Echo(String),
    Find(String),
    CitationLookup(Citation),
    /// Nothing matched. `diagnostic` is set when a command prefix was seen
    /// but its full pattern was not.
    Unrecognized { diagnostic: Option<String> },
}

/// The single outbound action produced for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Error { channel: String, text: String },
    Help { channel: String },
    Greeting { channel: String, user: String },
    Prompt { channel: String },
    Attachment { channel: String },
    Message { channel: String, text: String },
}

impl Reply {
    pub fn channel(&self) -> &str {
        match self {
            Reply::Error { channel, .. }
            | Reply::Help { channel }
            | Reply::Greeting { channel, .. }
            | Reply::Prompt { channel }
            | Reply::Attachment { channel }
            | Reply::Message { channel, .. } => channel,
        }
    }
}

/// A simple Slack-style message attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub fallback: String,
    pub title: String,
    pub title_link: String,
    pub text: String,
    pub color: String,
}
