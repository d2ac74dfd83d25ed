//! Library root for `casebot`.
//!
//! Casebot is a Slack bot for looking up case law on CourtListener:
//! - `find <case name>` searches by case name and links the best match
//! - `<volume> <reporter> <page>` resolves a citation to its opinion
//! - a few conversational commands (`help`, greetings, `echo`, `attachment`)
//!
//! The bot integrates with Slack for chat and with CourtListener over HTTP.
//! Each outside dependency sits behind a trait so the dispatch logic can be
//! exercised without a network.

pub mod base;
pub mod interaction;
pub mod prelude;
pub mod runtime;
pub mod service;

use anyhow::anyhow;
use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the casebot runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with HTTP, CourtListener, and chat clients
/// - Starts the main event loop for processing events
pub async fn start(config: Config) -> Void {
    info!("Starting casebot ...");

    // Start the crypto provider.
    crypto::aws_lc_rs::default_provider().install_default().map_err(|_| anyhow!("Failed to install the default crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
