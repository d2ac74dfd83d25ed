//! Canned chat copy.

/// Posted on `help`, and whenever the bot joins a channel.
pub const HELP_MESSAGE: &str = r#####"I'm casebot, and I look things up on CourtListener.

• `find <case name>` searches CourtListener by case name and links the best match.
• `<volume> <reporter> <page>` (e.g. `410 U.S. 113`) looks up a citation.
• `echo <anything>` repeats what you said.
• `attachment` shows off a message attachment.
• `help` shows this message.

Mention me in a channel, or send me a direct message."#####;

/// Posted when the message is not a command we know.
pub const PROMPT_MESSAGE: &str = "I'm not sure what you mean. Try `help` to see what I can do.";

/// Posted when a `find` prefix was seen but no query followed.
pub const DOES_NOT_COMPUTE: &str = "Does not compute.";

/// Posted when the `/c/` resolver answers 404.
pub const CITATION_NOT_FOUND: &str = "Sorry, I can't find that citation in CourtListener.";

/// Posted when a CourtListener call fails or returns something unusable.
pub const FETCH_FAILURE: &str = "Sorry, I couldn't get an answer from CourtListener.";

/// Prefix for forwarded platform errors.
pub const ERROR_PREFIX: &str = "Something went wrong on the chat platform:";

/// Build the greeting for `user_id`.
pub fn greeting(user_id: &str) -> String {
    format!("Hi <@{user_id}>! Ask me to `find` a case, or say `help`.")
}

/// Build the error notice for a forwarded platform error.
pub fn error_notice(raw: &str) -> String {
    format!("{ERROR_PREFIX}\n```{raw}```")
}

/// Build the zero-results reply for `query`.
pub fn zero_results(query: &str) -> String {
    format!("CourtListener had zero results for the query `{query}`")
}
