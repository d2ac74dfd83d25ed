//! Command extraction from message text.
//!
//! Rules are tried in order and the first one that claims the text wins, so
//! `find help` is a help request and `echo hi` is a greeting. The order lives
//! in `RULES` and nowhere else.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error};

use crate::base::types::{Citation, Command};

static GREETING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"hi|hey|hello|howdy").expect("Invalid Regex"));
static FIND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"find\s+(.+)$").expect("Invalid Regex"));
static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\s([A-Za-z0-9.\s]+)\s(\d+)$").expect("Invalid Regex"));

/// A rule returns `Some` when it claims the text.
type Rule = fn(&str) -> Option<Command>;

/// Rules in priority order.
const RULES: &[(&str, Rule)] = &[
    ("help", help),
    ("greeting", greeting),
    ("attachment", attachment),
    ("echo", echo),
    ("find", find),
    ("citation", citation),
];

/// Classify `text` as a command.
pub fn classify(text: &str) -> Command {
    RULES
        .iter()
        .find_map(|(name, rule)| {
            let command = rule(text)?;
            debug!(rule = *name, ?command, "Classified message.");
            Some(command)
        })
        .unwrap_or(Command::Unrecognized { diagnostic: None })
}

fn help(text: &str) -> Option<Command> {
    text.contains("help").then_some(Command::Help)
}

fn greeting(text: &str) -> Option<Command> {
    GREETING_RE.is_match(text).then_some(Command::Greeting)
}

fn attachment(text: &str) -> Option<Command> {
    text.contains("attachment").then_some(Command::AttachmentDemo)
}

fn echo(text: &str) -> Option<Command> {
    text.contains("echo").then(|| Command::Echo(text.to_string()))
}

/// Claims anything starting with `find`; a missing query is still claimed,
/// as an unrecognized command carrying a diagnostic.
fn find(text: &str) -> Option<Command> {
    if !text.starts_with("find") {
        return None;
    }

    match FIND_RE.captures(text).and_then(|c| c.get(1)) {
        Some(query) => Some(Command::Find(query.as_str().to_string())),
        None => {
            error!("Message starts with `find` but has no query: `{}`", text);
            Some(Command::Unrecognized {
                diagnostic: Some("`find` needs a case name to search for".to_string()),
            })
        }
    }
}

fn citation(text: &str) -> Option<Command> {
    let captures = CITATION_RE.captures(text)?;

    let volume = captures[1].parse().ok()?;
    let reporter = captures[2].to_string();
    let page = captures[3].parse().ok()?;

    Some(Command::CitationLookup(Citation { volume, reporter, page }))
}
