//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services casebot talks to:
//! - Chat services (e.g., Slack)
//! - HTTP (e.g., reqwest)
//! - CourtListener lookups, built on the HTTP service
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod court_listener;
pub mod http;
