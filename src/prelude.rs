//! Common imports.

pub use crate::base::{
    config::Config,
    types::{Command, Res, Reply, Void},
};
pub use crate::interaction::{dispatch::Dispatcher, event::Event};
pub use anyhow::anyhow;
pub use tracing::{debug, error, info, instrument, warn};
