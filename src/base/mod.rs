//! Core components, types, and utilities for casebot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Canned chat copy (help, greeting, prompt, failure replies).
//! - Common types and result handling.

pub mod config;
pub mod messages;
pub mod types;
