//! Milano Cortina 2026 medal standings.
//!
//! A coordinator polls the public medal standings API, keeps the last good
//! payload and exposes per-country medal sensors that read from it.

pub mod api;
pub mod config;
pub mod coordinator;
pub mod integration;
pub mod logging;
pub mod registry;
pub mod sensor;
pub mod setup;
pub mod shutdown;
