//! Event handling and user interactions for casebot.
//!
//! This module provides functionality for handling chat events:
//! - Parsing raw event records
//! - Extracting commands from message text
//! - Dispatching each event to at most one reply, and writing it

pub mod command;
pub mod dispatch;
pub mod event;
pub mod rtm_event;
pub mod writer;
