//! svcmon — fleet service-status dashboard.
//!
//! Reads per-host service statuses from the status API, keeps a normalized
//! host → services snapshot, and issues start/stop/restart/unfollow commands
//! behind a confirmation prompt. Every command is followed by a full resync.

pub mod error;
pub mod model;
pub mod client;
pub mod normalize;
pub mod snapshot;
pub mod sync;
pub mod confirm;
pub mod config;
pub mod logging;
pub mod view;
pub mod app;
