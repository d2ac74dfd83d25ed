//! Entry point for raw event records coming off the chat platform.

use serde_json::Value;
use tracing::Instrument;

use crate::prelude::*;

/// Handles one raw event record.
///
/// The record is parsed and dispatched on its own task, so a slow
/// CourtListener call never holds up the listener.
#[instrument(skip_all)]
pub fn handle_rtm_event(raw: Value, dispatcher: Dispatcher) {
    tokio::spawn(async move {
        // Process the event.
        let result = handle_rtm_event_internal(raw, &dispatcher).in_current_span().await;

        // Log any errors.
        if let Err(err) = &result {
            error!("Error while handling: {}", err);
        }
    });
}

/// Internal function to parse and dispatch the event.
#[instrument(skip_all)]
pub async fn handle_rtm_event_internal(raw: Value, dispatcher: &Dispatcher) -> Void {
    let event = match Event::from_value(raw) {
        Ok(Some(event)) => event,
        Ok(None) => {
            debug!("Ignoring record without a type.");
            return Ok(());
        }
        Err(err) => {
            warn!("Ignoring malformed event: {}", err);
            return Ok(());
        }
    };

    dispatcher.handle(event).await
}
